// Metrics engine: raw season rows in, a fully computed PlayerSeasonMetrics out.

pub mod creation;
pub mod physical;
pub mod possessions;
pub mod shooting;
pub mod splits;

use serde::Serialize;
use tracing::debug;

use crate::error::{ensure_finite, StatsError};
use crate::model::{
    DraftCombineMeasurements, LeagueAverageRates, PlayerId, RawPlayerSeasonStats,
    RawTeamSeasonStats, SeasonLabel, ShotDistanceRow,
};

use self::physical::Physical;
use self::possessions::Per100Rates;
use self::shooting::ShootingProfile;
use self::splits::ShotSplit;

/// Everything the engine needs for one player-season, already fetched and
/// scoped to the same season.
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    pub player: &'a RawPlayerSeasonStats,
    pub team: &'a RawTeamSeasonStats,
    pub league: &'a LeagueAverageRates,
    /// Listed height, e.g. `"6-9"`.
    pub height: &'a str,
    pub combine: Option<&'a DraftCombineMeasurements>,
    /// Distance buckets in the provider's fixed order.
    pub shot_distance: &'a [ShotDistanceRow],
}

/// Derived and advanced metrics for one player-season.
///
/// Built once by [`compute`] and never mutated afterwards, so values can be
/// shared freely across threads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSeasonMetrics {
    pub player_id: PlayerId,
    pub season: SeasonLabel,
    pub team_possessions: f64,
    pub per_100: Per100Rates,
    pub shooting: ShootingProfile,
    pub splits: Vec<ShotSplit>,
    pub box_creation: f64,
    pub offensive_load: f64,
    pub usage_rate: f64,
    pub physical: Physical,
}

impl PlayerSeasonMetrics {
    pub fn shooting_quality(&self) -> f64 {
        self.shooting.shooting_quality
    }

    pub fn spacing(&self) -> f64 {
        self.shooting.spacing
    }

    pub fn height_cm(&self) -> f64 {
        self.physical.height_cm
    }

    pub fn wingspan(&self) -> Option<f64> {
        self.physical.wingspan
    }

    /// Attempt shares in bucket order.
    pub fn split_shares(&self) -> Vec<f64> {
        self.splits.iter().map(|s| s.attempt_share).collect()
    }
}

fn validate(input: &MetricsInput<'_>) -> Result<(), StatsError> {
    let p = input.player;
    let player_fields: &[(&str, f64)] = &[
        ("player.min", p.min),
        ("player.fga", p.fga),
        ("player.fg_pct", p.fg_pct),
        ("player.fg3a", p.fg3a),
        ("player.fg3_pct", p.fg3_pct),
        ("player.fta", p.fta),
        ("player.ft_pct", p.ft_pct),
        ("player.oreb", p.oreb),
        ("player.ast", p.ast),
        ("player.tov", p.tov),
        ("player.pts", p.pts),
    ];
    let t = input.team;
    let team_fields: &[(&str, f64)] = &[
        ("team.min", t.min),
        ("team.fga", t.fga),
        ("team.fta", t.fta),
        ("team.tov", t.tov),
        ("team.oreb", t.oreb),
    ];
    for (field, value) in player_fields.iter().chain(team_fields) {
        ensure_finite(field, *value)?;
    }

    input.league.validate()?;

    if p.season != t.season {
        return Err(StatsError::invalid(
            "team.season",
            format!("player row is {} but team row is {}", p.season, t.season),
        ));
    }
    if p.team_id != t.team_id {
        return Err(StatsError::invalid(
            "team.team_id",
            format!("player row is team {} but team row is {}", p.team_id, t.team_id),
        ));
    }
    Ok(())
}

/// Compute every metric for one player-season.
///
/// Steps:
/// 1. Team possessions (must be > 0) and per-100 rates.
/// 2. Shooting profile against the league snapshot.
/// 3. Box creation (floored at 0) and offensive load.
/// 4. Usage rate (player minutes must be > 0).
/// 5. Height, optional combine measurements, shot-distance splits.
pub fn compute(input: &MetricsInput<'_>) -> Result<PlayerSeasonMetrics, StatsError> {
    validate(input)?;
    let player = input.player;

    let team_possessions = possessions::team_possessions(input.team)?;
    let per_100 = Per100Rates::from_player(player, team_possessions);

    let shooting = ShootingProfile::compute(player, input.league);

    let box_creation =
        creation::box_creation(per_100.ast, per_100.scoring(), shooting.three_pt_profile);
    let offensive_load = creation::offensive_load(&per_100, box_creation);

    let usage_rate = possessions::usage_rate(player, input.team)?;
    let physical = Physical::compute(input.height, input.combine)?;
    let splits = splits::shot_splits(input.shot_distance)?;

    debug!(
        player = %player.player_id,
        season = %player.season,
        team_possessions,
        box_creation,
        offensive_load,
        usage_rate,
        "computed player-season metrics"
    );

    Ok(PlayerSeasonMetrics {
        player_id: player.player_id,
        season: player.season,
        team_possessions,
        per_100,
        shooting,
        splits,
        box_creation,
        offensive_load,
        usage_rate,
        physical,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
