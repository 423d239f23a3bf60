// CSV-backed stats provider.
//
// Reads stats-provider exports with upper-case column names (PLAYER_ID,
// SEASON_ID, FG3_PCT, ...). Malformed rows are skipped with a warning; extra
// columns are ignored.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use courtside_core::model::{
    DraftCombineMeasurements, LeagueAverageRates, PlayerBio, PlayerId, RawPlayerSeasonStats,
    RawTeamSeasonStats, SeasonLabel, ShotDistanceRow, TeamId,
};
use courtside_core::StatsError;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::DataFiles;
use crate::provider::StatsProvider;

/// Fixed shot-distance bucket order. Every player's split sequence is laid
/// out against this list so two sequences always line up by position.
pub const SHOT_DISTANCE_BUCKETS: [&str; 9] = [
    "Less Than 5 ft.",
    "5-9 ft.",
    "10-14 ft.",
    "15-19 ft.",
    "20-24 ft.",
    "25-29 ft.",
    "30-34 ft.",
    "35-39 ft.",
    "40+ ft.",
];

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    #[serde(alias = "PERSON_ID")]
    PLAYER_ID: u32,
    #[serde(alias = "DISPLAY_FIRST_LAST")]
    FULL_NAME: String,
    TEAM_ID: u32,
    HEIGHT: String,
    FROM_YEAR: i32,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerSeasonRow {
    PLAYER_ID: u32,
    SEASON_ID: String,
    TEAM_ID: u32,
    MIN: f64,
    FGA: f64,
    FG_PCT: f64,
    FG3A: f64,
    FG3_PCT: f64,
    FTA: f64,
    FT_PCT: f64,
    OREB: f64,
    AST: f64,
    TOV: f64,
    PTS: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawTeamSeasonRow {
    TEAM_ID: u32,
    SEASON_ID: String,
    MIN: f64,
    FGA: f64,
    FTA: f64,
    TOV: f64,
    OREB: f64,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawLeagueRow {
    FG3_PCT: f64,
    FG_PCT: f64,
    FT_PCT: f64,
}

/// Blank WINGSPAN / MAX_VERTICAL_LEAP cells mean "not measured".
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawCombineRow {
    PLAYER_ID: u32,
    SEASON: i32,
    WINGSPAN: Option<f64>,
    MAX_VERTICAL_LEAP: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawShotDistanceRow {
    PLAYER_ID: u32,
    SEASON_ID: String,
    #[serde(alias = "BUCKET")]
    GROUP_VALUE: String,
    FGA: f64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn parse_season(raw: &str, context: &str) -> Option<SeasonLabel> {
    match SeasonLabel::parse(raw) {
        Ok(season) => Some(season),
        Err(e) => {
            warn!("skipping {context} row: {e}");
            None
        }
    }
}

/// Lay raw bucket rows out against `SHOT_DISTANCE_BUCKETS`, summing
/// duplicates and filling missing buckets with zero attempts.
fn align_buckets(rows: &[(String, f64)]) -> Vec<ShotDistanceRow> {
    let mut fga = [0.0_f64; SHOT_DISTANCE_BUCKETS.len()];
    for (label, attempts) in rows {
        match SHOT_DISTANCE_BUCKETS.iter().position(|b| b == label) {
            Some(i) => fga[i] += attempts,
            None => warn!("dropping unknown shot-distance bucket {label:?}"),
        }
    }
    SHOT_DISTANCE_BUCKETS
        .iter()
        .zip(fga)
        .map(|(bucket, attempts)| ShotDistanceRow::new(*bucket, attempts))
        .collect()
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerBio>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players = Vec::new();
    for result in reader.deserialize::<RawPlayerRow>() {
        match result {
            Ok(raw) => players.push(PlayerBio {
                player_id: PlayerId(raw.PLAYER_ID),
                full_name: raw.FULL_NAME.trim().to_string(),
                team_id: TeamId(raw.TEAM_ID),
                height: raw.HEIGHT.trim().to_string(),
                debut_year: raw.FROM_YEAR,
            }),
            Err(e) => warn!("skipping malformed player row: {}", e),
        }
    }
    Ok(players)
}

fn load_player_seasons_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<(PlayerId, SeasonLabel), RawPlayerSeasonStats>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawPlayerSeasonRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player-season row: {}", e);
                continue;
            }
        };
        let Some(season) = parse_season(&raw.SEASON_ID, "player-season") else {
            continue;
        };
        if !all_finite(&[
            raw.MIN, raw.FGA, raw.FG_PCT, raw.FG3A, raw.FG3_PCT, raw.FTA, raw.FT_PCT, raw.OREB,
            raw.AST, raw.TOV, raw.PTS,
        ]) {
            warn!(
                "skipping player {} season {}: non-finite value",
                raw.PLAYER_ID, season
            );
            continue;
        }
        let stats = RawPlayerSeasonStats {
            player_id: PlayerId(raw.PLAYER_ID),
            season,
            team_id: TeamId(raw.TEAM_ID),
            min: raw.MIN,
            fga: raw.FGA,
            fg_pct: raw.FG_PCT,
            fg3a: raw.FG3A,
            fg3_pct: raw.FG3_PCT,
            fta: raw.FTA,
            ft_pct: raw.FT_PCT,
            oreb: raw.OREB,
            ast: raw.AST,
            tov: raw.TOV,
            pts: raw.PTS,
        };
        if map.insert((stats.player_id, season), stats).is_some() {
            warn!(
                "duplicate season row for player {} in {}, using latest",
                raw.PLAYER_ID, season
            );
        }
    }
    Ok(map)
}

fn load_team_seasons_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<(TeamId, SeasonLabel), RawTeamSeasonStats>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawTeamSeasonRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed team-season row: {}", e);
                continue;
            }
        };
        let Some(season) = parse_season(&raw.SEASON_ID, "team-season") else {
            continue;
        };
        if !all_finite(&[raw.MIN, raw.FGA, raw.FTA, raw.TOV, raw.OREB]) {
            warn!("skipping team {} season {}: non-finite value", raw.TEAM_ID, season);
            continue;
        }
        let stats = RawTeamSeasonStats {
            team_id: TeamId(raw.TEAM_ID),
            season,
            min: raw.MIN,
            fga: raw.FGA,
            fta: raw.FTA,
            tov: raw.TOV,
            oreb: raw.OREB,
        };
        if map.insert((stats.team_id, season), stats).is_some() {
            warn!(
                "duplicate season row for team {} in {}, using latest",
                raw.TEAM_ID, season
            );
        }
    }
    Ok(map)
}

/// First valid row wins; the file holds a single current snapshot.
fn load_league_from_reader<R: Read>(rdr: R) -> Result<Option<LeagueAverageRates>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    for result in reader.deserialize::<RawLeagueRow>() {
        match result {
            Ok(raw) => match LeagueAverageRates::new(raw.FG3_PCT, raw.FG_PCT, raw.FT_PCT) {
                Ok(rates) => return Ok(Some(rates)),
                Err(e) => warn!("skipping league-average row: {}", e),
            },
            Err(e) => warn!("skipping malformed league-average row: {}", e),
        }
    }
    Ok(None)
}

fn load_combine_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<(PlayerId, i32), DraftCombineMeasurements>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut map = HashMap::new();
    for result in reader.deserialize::<RawCombineRow>() {
        match result {
            Ok(raw) => {
                let player_id = PlayerId(raw.PLAYER_ID);
                map.insert(
                    (player_id, raw.SEASON),
                    DraftCombineMeasurements {
                        player_id,
                        wingspan: raw.WINGSPAN,
                        vertical_leap: raw.MAX_VERTICAL_LEAP,
                    },
                );
            }
            Err(e) => warn!("skipping malformed combine row: {}", e),
        }
    }
    Ok(map)
}

fn load_shot_distance_from_reader<R: Read>(
    rdr: R,
) -> Result<HashMap<(PlayerId, SeasonLabel), Vec<ShotDistanceRow>>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut grouped: HashMap<(PlayerId, SeasonLabel), Vec<(String, f64)>> = HashMap::new();
    for result in reader.deserialize::<RawShotDistanceRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed shot-distance row: {}", e);
                continue;
            }
        };
        let Some(season) = parse_season(&raw.SEASON_ID, "shot-distance") else {
            continue;
        };
        if !raw.FGA.is_finite() {
            warn!("skipping shot-distance row for player {}: non-finite FGA", raw.PLAYER_ID);
            continue;
        }
        grouped
            .entry((PlayerId(raw.PLAYER_ID), season))
            .or_default()
            .push((raw.GROUP_VALUE.trim().to_string(), raw.FGA));
    }
    Ok(grouped
        .into_iter()
        .map(|(key, rows)| (key, align_buckets(&rows)))
        .collect())
}

// ---------------------------------------------------------------------------
// Public path-based loading
// ---------------------------------------------------------------------------

fn open_csv<T>(
    path: &Path,
    load: impl FnOnce(std::fs::File) -> Result<T, csv::Error>,
) -> Result<T, DatasetError> {
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load(file).map_err(|e| DatasetError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Like `open_csv`, but a missing file yields an empty table.
fn open_optional_csv<T: Default>(
    path: &Path,
    load: impl FnOnce(std::fs::File) -> Result<T, csv::Error>,
) -> Result<T, DatasetError> {
    if !path.exists() {
        warn!("{} not found, continuing without it", path.display());
        return Ok(T::default());
    }
    open_csv(path, load)
}

/// In-memory tables loaded from a directory of CSV exports.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    players: Vec<PlayerBio>,
    player_seasons: HashMap<(PlayerId, SeasonLabel), RawPlayerSeasonStats>,
    team_seasons: HashMap<(TeamId, SeasonLabel), RawTeamSeasonStats>,
    league: Option<LeagueAverageRates>,
    combine: HashMap<(PlayerId, i32), DraftCombineMeasurements>,
    shot_distance: HashMap<(PlayerId, SeasonLabel), Vec<ShotDistanceRow>>,
}

impl Dataset {
    /// Load every table named in `files`, relative to `dir`.
    pub fn load(dir: &Path, files: &DataFiles) -> Result<Self, DatasetError> {
        let dataset = Dataset {
            players: open_csv(&dir.join(&files.players), load_players_from_reader)?,
            player_seasons: open_csv(
                &dir.join(&files.player_seasons),
                load_player_seasons_from_reader,
            )?,
            team_seasons: open_csv(&dir.join(&files.team_seasons), load_team_seasons_from_reader)?,
            league: open_csv(&dir.join(&files.league_averages), load_league_from_reader)?,
            combine: open_optional_csv(&dir.join(&files.draft_combine), load_combine_from_reader)?,
            shot_distance: open_csv(&dir.join(&files.shot_distance), load_shot_distance_from_reader)?,
        };

        if dataset.players.is_empty() {
            return Err(DatasetError::Validation(
                "player CSV produced zero valid rows".into(),
            ));
        }
        if dataset.league.is_none() {
            return Err(DatasetError::Validation(
                "league-average CSV produced no valid snapshot".into(),
            ));
        }

        debug!(
            players = dataset.players.len(),
            player_seasons = dataset.player_seasons.len(),
            team_seasons = dataset.team_seasons.len(),
            combine = dataset.combine.len(),
            "dataset loaded from {}",
            dir.display()
        );
        Ok(dataset)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Every player-season with stats on file, sorted by player then season.
    pub fn player_season_keys(&self) -> Vec<(PlayerId, SeasonLabel)> {
        let mut keys: Vec<_> = self.player_seasons.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl StatsProvider for Dataset {
    fn resolve_player_id(&self, full_name: &str) -> Result<PlayerId, StatsError> {
        let wanted = full_name.trim();
        let mut matches = self.players.iter().filter(|p| p.full_name == wanted);
        let first = matches
            .next()
            .ok_or_else(|| StatsError::not_found("player", wanted))?;
        if matches.next().is_some() {
            warn!("several players named '{}', using id {}", wanted, first.player_id);
        }
        Ok(first.player_id)
    }

    fn player_bio(&self, player: PlayerId) -> Result<PlayerBio, StatsError> {
        self.players
            .iter()
            .find(|p| p.player_id == player)
            .cloned()
            .ok_or_else(|| StatsError::not_found("player bio", player.to_string()))
    }

    fn player_season_stats(
        &self,
        player: PlayerId,
        season: SeasonLabel,
    ) -> Result<RawPlayerSeasonStats, StatsError> {
        self.player_seasons
            .get(&(player, season))
            .cloned()
            .ok_or_else(|| StatsError::not_found("player season", format!("{player} in {season}")))
    }

    fn team_season_stats(
        &self,
        team: TeamId,
        season: SeasonLabel,
    ) -> Result<RawTeamSeasonStats, StatsError> {
        self.team_seasons
            .get(&(team, season))
            .cloned()
            .ok_or_else(|| StatsError::not_found("team season", format!("{team} in {season}")))
    }

    fn league_averages(&self) -> Result<LeagueAverageRates, StatsError> {
        self.league
            .ok_or_else(|| StatsError::not_found("league averages", "current snapshot"))
    }

    fn draft_combine(
        &self,
        player: PlayerId,
        debut_year: i32,
    ) -> Result<Option<DraftCombineMeasurements>, StatsError> {
        Ok(self.combine.get(&(player, debut_year)).copied())
    }

    fn shot_distance_splits(
        &self,
        player: PlayerId,
        season: SeasonLabel,
    ) -> Result<Vec<ShotDistanceRow>, StatsError> {
        self.shot_distance
            .get(&(player, season))
            .cloned()
            .ok_or_else(|| {
                StatsError::not_found("shot-distance splits", format!("{player} in {season}"))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
