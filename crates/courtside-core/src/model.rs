// Raw, already-tabulated rows handed to the core by the data-access layer.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::StatsError;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Season label
// ---------------------------------------------------------------------------

/// A season in `"YYYY-YY"` form, e.g. `"2019-20"`.
///
/// Only the start year is stored; the two-digit suffix is always the
/// following year, so `"1999-00"` is valid and `"2019-21"` is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeasonLabel {
    start_year: i32,
}

impl SeasonLabel {
    pub fn parse(label: &str) -> Result<Self, StatsError> {
        let label = label.trim();
        let bad = |message: &str| StatsError::invalid("season", format!("{message}: {label:?}"));

        let (start, end) = label
            .split_once('-')
            .ok_or_else(|| bad("expected YYYY-YY"))?;
        if start.len() != 4 || end.len() != 2 {
            return Err(bad("expected YYYY-YY"));
        }
        if !start.bytes().chain(end.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(bad("season label must be numeric"));
        }
        let start_year: i32 = start.parse().map_err(|_| bad("bad start year"))?;
        let suffix: i32 = end.parse().map_err(|_| bad("bad end year"))?;
        if (start_year + 1) % 100 != suffix {
            return Err(bad("end year must follow start year"));
        }
        Ok(SeasonLabel { start_year })
    }

    pub fn from_start_year(start_year: i32) -> Self {
        SeasonLabel { start_year }
    }

    /// The season a calendar date falls in. Seasons tip off in October, so
    /// anything from October onward belongs to the season starting that year.
    pub fn containing(date: NaiveDate) -> Self {
        let start_year = if date.month() >= 10 {
            date.year()
        } else {
            date.year() - 1
        };
        SeasonLabel { start_year }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }
}

impl fmt::Display for SeasonLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.start_year, (self.start_year + 1).rem_euclid(100))
    }
}

impl std::str::FromStr for SeasonLabel {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeasonLabel::parse(s)
    }
}

impl TryFrom<String> for SeasonLabel {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SeasonLabel::parse(&value)
    }
}

impl From<SeasonLabel> for String {
    fn from(value: SeasonLabel) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One player's per-season box-score row.
///
/// Percentages are fractions in [0,1]. Counting stats use whatever scope the
/// provider tabulates (per game or totals), as long as the team row matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPlayerSeasonStats {
    pub player_id: PlayerId,
    pub season: SeasonLabel,
    pub team_id: TeamId,
    pub min: f64,
    pub fga: f64,
    pub fg_pct: f64,
    pub fg3a: f64,
    pub fg3_pct: f64,
    pub fta: f64,
    pub ft_pct: f64,
    pub oreb: f64,
    pub ast: f64,
    pub tov: f64,
    pub pts: f64,
}

/// One team's per-season row. Only used as the denominator context for a
/// player's per-100-possession rates and usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTeamSeasonStats {
    pub team_id: TeamId,
    pub season: SeasonLabel,
    pub min: f64,
    pub fga: f64,
    pub fta: f64,
    pub tov: f64,
    pub oreb: f64,
}

/// League-wide shooting percentages. A single current snapshot, not tied to
/// the season being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverageRates {
    pub fg3_pct: f64,
    pub fg_pct: f64,
    pub ft_pct: f64,
}

impl LeagueAverageRates {
    /// Build a snapshot, rejecting any rate outside [0,1].
    pub fn new(fg3_pct: f64, fg_pct: f64, ft_pct: f64) -> Result<Self, StatsError> {
        let rates = LeagueAverageRates {
            fg3_pct,
            fg_pct,
            ft_pct,
        };
        rates.validate()?;
        Ok(rates)
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        for (field, value) in [
            ("league.fg3_pct", self.fg3_pct),
            ("league.fg_pct", self.fg_pct),
            ("league.ft_pct", self.ft_pct),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StatsError::invalid(
                    field,
                    format!("must be a fraction in [0,1], got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// Draft-combine measurements in centimeters. Either value may be missing
/// even when the player attended the combine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DraftCombineMeasurements {
    pub player_id: PlayerId,
    pub wingspan: Option<f64>,
    pub vertical_leap: Option<f64>,
}

/// Biographical row from the provider's player-info lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBio {
    pub player_id: PlayerId,
    pub full_name: String,
    pub team_id: TeamId,
    /// Listed height, e.g. `"6-9"` or `6'9"`.
    pub height: String,
    /// First season year in the league; keys the draft-combine lookup.
    pub debut_year: i32,
}

/// Field-goal attempts from one shot-distance bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotDistanceRow {
    pub bucket: String,
    pub fga: f64,
}

impl ShotDistanceRow {
    pub fn new(bucket: impl Into<String>, fga: f64) -> Self {
        ShotDistanceRow {
            bucket: bucket.into(),
            fga,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_label_parses_and_displays() {
        let season = SeasonLabel::parse("2019-20").unwrap();
        assert_eq!(season.start_year(), 2019);
        assert_eq!(season.to_string(), "2019-20");
    }

    #[test]
    fn season_label_wraps_century() {
        let season = SeasonLabel::parse("1999-00").unwrap();
        assert_eq!(season.start_year(), 1999);
        assert_eq!(season.to_string(), "1999-00");
    }

    #[test]
    fn season_label_rejects_bad_shapes() {
        for bad in ["2019", "2019-2020", "19-20", "2019-21", "20a9-20", ""] {
            let err = SeasonLabel::parse(bad).unwrap_err();
            assert_eq!(err.field(), Some("season"), "input {bad:?}");
        }
    }

    #[test]
    fn season_containing_date_splits_on_october() {
        let sept = NaiveDate::from_ymd_opt(2020, 9, 30).unwrap();
        let oct = NaiveDate::from_ymd_opt(2020, 10, 1).unwrap();
        assert_eq!(SeasonLabel::containing(sept).to_string(), "2019-20");
        assert_eq!(SeasonLabel::containing(oct).to_string(), "2020-21");
    }

    #[test]
    fn season_label_serde_as_string() {
        let season = SeasonLabel::parse("2015-16").unwrap();
        let json = serde_json::to_string(&season).unwrap();
        assert_eq!(json, "\"2015-16\"");
        let back: SeasonLabel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, season);
        assert!(serde_json::from_str::<SeasonLabel>("\"2015-17\"").is_err());
    }

    #[test]
    fn league_rates_must_be_fractions() {
        assert!(LeagueAverageRates::new(0.36, 0.46, 0.78).is_ok());
        let err = LeagueAverageRates::new(36.0, 0.46, 0.78).unwrap_err();
        assert_eq!(err.field(), Some("league.fg3_pct"));
        let err = LeagueAverageRates::new(0.36, 0.46, -0.1).unwrap_err();
        assert_eq!(err.field(), Some("league.ft_pct"));
    }
}
