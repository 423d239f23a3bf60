// Team possessions, per-100-possession rates, and usage rate.

use crate::error::StatsError;
use crate::model::{RawPlayerSeasonStats, RawTeamSeasonStats};

/// Weight of a free-throw attempt relative to a possession-ending shot.
pub const FTA_POSSESSION_WEIGHT: f64 = 0.44;

/// Scale applied to the raw possession estimate.
const POSSESSION_SCALE: f64 = 0.96;

/// Estimated team possessions:
/// `0.96 * (FGA + TOV + 0.44 * FTA - OREB)`.
///
/// Every per-100 rate divides by this, so a non-positive estimate is
/// rejected instead of producing NaN or infinity downstream.
pub fn team_possessions(team: &RawTeamSeasonStats) -> Result<f64, StatsError> {
    let possessions =
        POSSESSION_SCALE * (team.fga + team.tov + FTA_POSSESSION_WEIGHT * team.fta - team.oreb);
    if !possessions.is_finite() || possessions <= 0.0 {
        return Err(StatsError::invalid(
            "team.possessions",
            format!("must be > 0, got {possessions}"),
        ));
    }
    Ok(possessions)
}

/// `value * 100 / team_possessions`. Callers guarantee `team_possessions > 0`.
pub fn per_100(value: f64, team_possessions: f64) -> f64 {
    value * 100.0 / team_possessions
}

/// Counting stats normalized to 100 team possessions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Per100Rates {
    pub ast: f64,
    pub pts: f64,
    pub tov: f64,
    pub fga: f64,
    pub fta: f64,
}

impl Per100Rates {
    pub fn from_player(player: &RawPlayerSeasonStats, team_possessions: f64) -> Self {
        Per100Rates {
            ast: per_100(player.ast, team_possessions),
            pts: per_100(player.pts, team_possessions),
            tov: per_100(player.tov, team_possessions),
            fga: per_100(player.fga, team_possessions),
            fta: per_100(player.fta, team_possessions),
        }
    }

    /// Points plus turnovers per 100, the scoring term of box creation.
    pub fn scoring(&self) -> f64 {
        self.pts + self.tov
    }
}

/// Traditional usage rate:
///
/// `100 * (FGA + 0.44*FTA + TOV) * (team_MIN * 5 / 5)
///  / (MIN * (team_FGA + 0.44*team_FTA + team_TOV))`
///
/// The `* 5 / 5` is kept as written; team minutes come in already scaled.
pub fn usage_rate(
    player: &RawPlayerSeasonStats,
    team: &RawTeamSeasonStats,
) -> Result<f64, StatsError> {
    if player.min <= 0.0 {
        return Err(StatsError::invalid(
            "player.min",
            format!("must be > 0, got {}", player.min),
        ));
    }
    let team_load = team.fga + FTA_POSSESSION_WEIGHT * team.fta + team.tov;
    if team_load <= 0.0 {
        return Err(StatsError::invalid(
            "team.possession_load",
            format!("must be > 0, got {team_load}"),
        ));
    }
    let player_load = player.fga + FTA_POSSESSION_WEIGHT * player.fta + player.tov;
    Ok(100.0 * player_load * (team.min * 5.0 / 5.0) / (player.min * team_load))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PlayerId, SeasonLabel, TeamId};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn team(min: f64, fga: f64, fta: f64, tov: f64, oreb: f64) -> RawTeamSeasonStats {
        RawTeamSeasonStats {
            team_id: TeamId(1),
            season: SeasonLabel::from_start_year(2019),
            min,
            fga,
            fta,
            tov,
            oreb,
        }
    }

    fn player(min: f64, fga: f64, fta: f64, tov: f64) -> RawPlayerSeasonStats {
        RawPlayerSeasonStats {
            player_id: PlayerId(7),
            season: SeasonLabel::from_start_year(2019),
            team_id: TeamId(1),
            min,
            fga,
            fg_pct: 0.45,
            fg3a: 0.0,
            fg3_pct: 0.0,
            fta,
            ft_pct: 0.75,
            oreb: 0.0,
            ast: 5.0,
            tov,
            pts: 25.0,
        }
    }

    #[test]
    fn team_possessions_known_value() {
        // 0.96 * (88 + 13 + 0.44*22 - 10) = 0.96 * 100.68 = 96.6528
        let poss = team_possessions(&team(48.0, 88.0, 22.0, 13.0, 10.0)).unwrap();
        assert!(approx_eq(poss, 96.6528, 1e-9));
    }

    #[test]
    fn zero_possessions_rejected() {
        let err = team_possessions(&team(48.0, 0.0, 0.0, 0.0, 0.0)).unwrap_err();
        assert_eq!(err.field(), Some("team.possessions"));
    }

    #[test]
    fn negative_possessions_rejected() {
        // Offensive rebounds exceeding every other term
        let err = team_possessions(&team(48.0, 5.0, 0.0, 1.0, 20.0)).unwrap_err();
        assert_eq!(err.field(), Some("team.possessions"));
    }

    #[test]
    fn per_100_scales_to_hundred_possessions() {
        assert!(approx_eq(per_100(5.0, 50.0), 10.0, 1e-12));
        assert!(approx_eq(per_100(0.0, 96.0), 0.0, 1e-12));
    }

    #[test]
    fn per_100_rates_from_player() {
        let rates = Per100Rates::from_player(&player(34.0, 18.0, 6.0, 3.0), 100.0);
        assert!(approx_eq(rates.ast, 5.0, 1e-12));
        assert!(approx_eq(rates.pts, 25.0, 1e-12));
        assert!(approx_eq(rates.fga, 18.0, 1e-12));
        assert!(approx_eq(rates.scoring(), 28.0, 1e-12));
    }

    #[test]
    fn usage_is_hundred_when_player_matches_team() {
        // Same minutes and same possession load as the team reduces to 100.
        let t = team(48.0, 88.0, 22.0, 13.0, 10.0);
        let p = player(48.0, 88.0, 22.0, 13.0);
        assert!(approx_eq(usage_rate(&p, &t).unwrap(), 100.0, 1e-9));
    }

    #[test]
    fn usage_known_value() {
        // 100 * (18 + 2.64 + 3) * 48 / (34 * (88 + 9.68 + 13)) = 30.1537...
        let t = team(48.0, 88.0, 22.0, 13.0, 10.0);
        let p = player(34.0, 18.0, 6.0, 3.0);
        assert!(approx_eq(usage_rate(&p, &t).unwrap(), 30.153702247071575, 1e-9));
    }

    #[test]
    fn usage_rejects_zero_minutes() {
        let t = team(48.0, 88.0, 22.0, 13.0, 10.0);
        let err = usage_rate(&player(0.0, 18.0, 6.0, 3.0), &t).unwrap_err();
        assert_eq!(err.field(), Some("player.min"));
    }

    #[test]
    fn usage_rejects_zero_team_load() {
        // No attempts, free throws or turnovers; offensive rebounds alone.
        let t = team(48.0, 0.0, 0.0, 0.0, 10.0);
        let err = usage_rate(&player(34.0, 18.0, 6.0, 3.0), &t).unwrap_err();
        assert_eq!(err.field(), Some("team.possession_load"));
    }
}
