// Shooting metrics: three-point profile, standardized and padded
// percentages, spacing, and shooting quality.

use serde::Serialize;

use crate::model::{LeagueAverageRates, RawPlayerSeasonStats};

/// One "standard deviation" of three-point percentage.
pub const FG3_SPREAD: f64 = 0.05;
/// One "standard deviation" of field-goal percentage.
pub const FG_SPREAD: f64 = 0.10;
/// One "standard deviation" of free-throw percentage.
pub const FT_SPREAD: f64 = 0.10;

/// Padding maps [-PAD_RANGE, +PAD_RANGE] standard deviations onto [0, 100].
const PAD_RANGE: f64 = 3.0;

const BLEND_FG3_WEIGHT: f64 = 5.0;
const BLEND_FT_WEIGHT: f64 = 1.0;

/// Logistic squash of raw three-point attempts into (0, 1):
/// `2 / (1 + e^(-FG3A)) - 1`.
///
/// Zero attempts gives 0; each extra attempt adds less than the last.
pub fn three_point_volume_scalar(fg3a: f64) -> f64 {
    2.0 / (1.0 + (-fg3a).exp()) - 1.0
}

/// Three-point percentage weighted by attempt volume.
pub fn three_point_profile(fg3_pct: f64, fg3a: f64) -> f64 {
    fg3_pct * three_point_volume_scalar(fg3a)
}

/// `(player_pct - league_pct) / spread`.
pub fn standardize(player_pct: f64, league_pct: f64, spread: f64) -> f64 {
    (player_pct - league_pct) / spread
}

/// Rescale a standardized value from [-3, +3] into [0, 100]:
/// `((z + 3) / 6) * 100`.
///
/// Not clamped. Inputs beyond three spreads land outside [0, 100].
pub fn pad(z: f64) -> f64 {
    ((z + PAD_RANGE) / (2.0 * PAD_RANGE)) * 100.0
}

/// `(padded_3P * 5 + padded_FT * 1) / 6`.
pub fn blended_pct(padded_fg3: f64, padded_ft: f64) -> f64 {
    (padded_fg3 * BLEND_FG3_WEIGHT + padded_ft * BLEND_FT_WEIGHT)
        / (BLEND_FG3_WEIGHT + BLEND_FT_WEIGHT)
}

/// `FG3A * (((FG3_PCT * 1.5) * 1.5) - 0.535)`.
///
/// Negative for high-volume shooters below the break-even percentage.
pub fn spacing(fg3a: f64, fg3_pct: f64) -> f64 {
    fg3a * (((fg3_pct * 1.5) * 1.5) - 0.535)
}

/// `(spacing * 2 + (padded_FT + padded_3P) * 5) / 7`.
pub fn shooting_quality(spacing: f64, padded_ft: f64, padded_fg3: f64) -> f64 {
    (spacing * 2.0 + (padded_ft + padded_fg3) * 5.0) / 7.0
}

/// All shooting-derived values for one player-season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShootingProfile {
    pub three_pt_profile: f64,
    pub standardized_fg3: f64,
    pub standardized_fg: f64,
    pub standardized_ft: f64,
    pub padded_fg3: f64,
    pub padded_ft: f64,
    pub blended_pct: f64,
    pub spacing: f64,
    pub shooting_quality: f64,
}

impl ShootingProfile {
    pub fn compute(player: &RawPlayerSeasonStats, league: &LeagueAverageRates) -> Self {
        let standardized_fg3 = standardize(player.fg3_pct, league.fg3_pct, FG3_SPREAD);
        let standardized_fg = standardize(player.fg_pct, league.fg_pct, FG_SPREAD);
        let standardized_ft = standardize(player.ft_pct, league.ft_pct, FT_SPREAD);
        let padded_fg3 = pad(standardized_fg3);
        let padded_ft = pad(standardized_ft);
        let spacing = spacing(player.fg3a, player.fg3_pct);

        ShootingProfile {
            three_pt_profile: three_point_profile(player.fg3_pct, player.fg3a),
            standardized_fg3,
            standardized_fg,
            standardized_ft,
            padded_fg3,
            padded_ft,
            blended_pct: blended_pct(padded_fg3, padded_ft),
            spacing,
            shooting_quality: shooting_quality(spacing, padded_ft, padded_fg3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn volume_scalar_bounds() {
        assert!(approx_eq(three_point_volume_scalar(0.0), 0.0, 1e-12));
        let high = three_point_volume_scalar(40.0);
        assert!(high < 1.0 + 1e-12 && high > 0.999);
        // 2 / (1 + e^-1) - 1 = 0.46211...
        assert!(approx_eq(three_point_volume_scalar(1.0), 0.4621171572600098, 1e-12));
    }

    #[test]
    fn volume_beats_low_attempt_accuracy() {
        // 36% on 8 attempts outranks 50% on a single attempt.
        assert!(three_point_profile(0.36, 8.0) > three_point_profile(0.50, 1.0));
    }

    #[test]
    fn standardize_uses_spread() {
        assert!(approx_eq(standardize(0.41, 0.36, FG3_SPREAD), 1.0, 1e-9));
        assert!(approx_eq(standardize(0.66, 0.46, FG_SPREAD), 2.0, 1e-9));
    }

    #[test]
    fn pad_maps_three_spreads_to_display_range() {
        assert!(approx_eq(pad(-3.0), 0.0, 1e-12));
        assert!(approx_eq(pad(0.0), 50.0, 1e-12));
        assert!(approx_eq(pad(3.0), 100.0, 1e-12));
    }

    #[test]
    fn pad_is_not_clamped() {
        assert!(approx_eq(pad(6.0), 150.0, 1e-12));
        assert!(approx_eq(pad(-4.5), -25.0, 1e-12));
    }

    #[test]
    fn blended_weights_three_point_five_to_one() {
        assert!(approx_eq(blended_pct(60.0, 0.0), 50.0, 1e-12));
        assert!(approx_eq(blended_pct(0.0, 60.0), 10.0, 1e-12));
    }

    #[test]
    fn spacing_can_go_negative() {
        // 10 * (0.20 * 2.25 - 0.535) = -0.85
        assert!(approx_eq(spacing(10.0, 0.20), -0.85, 1e-9));
        // 8 * (0.35 * 2.25 - 0.535) = 2.02
        assert!(approx_eq(spacing(8.0, 0.35), 2.02, 1e-9));
    }

    #[test]
    fn shooting_quality_known_value() {
        // (2.02*2 + (56.67 + 46.67)*5) / 7
        let q = shooting_quality(2.02, 56.666666666666664, 46.666666666666664);
        assert!(approx_eq(q, 74.38666666666667, 1e-9));
    }
}
