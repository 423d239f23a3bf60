// Box creation and offensive load.
//
// Box creation follows Ben Taylor's public regression over per-100 assists,
// per-100 scoring (points + turnovers), and three-point profile.

use super::possessions::{Per100Rates, FTA_POSSESSION_WEIGHT};

/// Regression coefficients for box creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCreationCoefficients {
    pub assists: f64,
    pub scoring: f64,
    pub three_pt_profile: f64,
    pub interaction: f64,
    pub intercept: f64,
}

pub const BOX_CREATION: BoxCreationCoefficients = BoxCreationCoefficients {
    assists: 0.1843,
    scoring: 0.0969,
    three_pt_profile: -2.3021,
    interaction: 0.0582,
    intercept: -1.1942,
};

/// Scale applied to box creation inside the offensive-load formula only.
const LOAD_CREATION_SCALE: f64 = 1.5;

/// Raw regression output before flooring. Can be negative.
pub fn box_creation_raw(asth: f64, scoring_h: f64, three_pt_profile: f64) -> f64 {
    let c = &BOX_CREATION;
    asth * c.assists
        + scoring_h * c.scoring
        + three_pt_profile * c.three_pt_profile
        + c.interaction * (asth * scoring_h * three_pt_profile)
        + c.intercept
}

/// Box creation floored at 0. No ceiling; Westbrook's heaviest seasons sit
/// around 20.
pub fn box_creation(asth: f64, scoring_h: f64, three_pt_profile: f64) -> f64 {
    box_creation_raw(asth, scoring_h, three_pt_profile).max(0.0)
}

/// `((asth - 0.38 * bc15) * 0.75) + fgah + 0.44 * ftah + bc15 + tovh`
/// where `bc15 = box_creation * 1.5`.
pub fn offensive_load(rates: &Per100Rates, box_creation: f64) -> f64 {
    let scaled_creation = box_creation * LOAD_CREATION_SCALE;
    ((rates.ast - 0.38 * scaled_creation) * 0.75)
        + rates.fga
        + FTA_POSSESSION_WEIGHT * rates.fta
        + scaled_creation
        + rates.tov
}
