// Height conversion and optional draft-combine measurements.

use serde::Serialize;

use crate::error::StatsError;
use crate::model::DraftCombineMeasurements;

const CM_PER_FOOT: f64 = 30.48;
const CM_PER_INCH: f64 = 2.54;

/// Convert a listed height to centimeters: `feet * 30.48 + inches * 2.54`.
///
/// Accepts `6-9`, `5-11`, `6'9"` and `6' 11"`. Inches must be below 12.
pub fn height_to_cm(height: &str) -> Result<f64, StatsError> {
    let bad = |message: &str| StatsError::invalid("player.height", format!("{message}: {height:?}"));

    let trimmed = height.trim().trim_end_matches('"');
    let (feet, inches) = trimmed
        .split_once(|c: char| c == '-' || c == '\'')
        .ok_or_else(|| bad("expected feet-inches"))?;

    let feet: u32 = feet.trim().parse().map_err(|_| bad("bad feet component"))?;
    let inches = inches.trim();
    if inches.is_empty() || inches.len() > 2 {
        return Err(bad("inches must be one or two digits"));
    }
    let inches: u32 = inches.parse().map_err(|_| bad("bad inches component"))?;
    if inches >= 12 {
        return Err(bad("inches must be below 12"));
    }

    Ok(f64::from(feet) * CM_PER_FOOT + f64::from(inches) * CM_PER_INCH)
}

/// Physical measurements carried on the metrics value. Wingspan and
/// vertical stay `None` when the player never measured at the combine;
/// they are never replaced by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Physical {
    pub height_cm: f64,
    pub wingspan: Option<f64>,
    pub vertical_leap: Option<f64>,
}

impl Physical {
    pub fn compute(
        height: &str,
        combine: Option<&DraftCombineMeasurements>,
    ) -> Result<Self, StatsError> {
        let measured = |value: Option<f64>| value.filter(|v| v.is_finite());
        Ok(Physical {
            height_cm: height_to_cm(height)?,
            wingspan: combine.and_then(|c| measured(c.wingspan)),
            vertical_leap: combine.and_then(|c| measured(c.vertical_leap)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PlayerId;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn single_digit_inches() {
        // 6*30.48 + 9*2.54 = 205.74
        assert!(approx_eq(height_to_cm("6-9").unwrap(), 205.74, 1e-9));
    }

    #[test]
    fn two_digit_inches() {
        // 5*30.48 + 11*2.54 = 180.34
        assert!(approx_eq(height_to_cm("5-11").unwrap(), 180.34, 1e-9));
    }

    #[test]
    fn feet_and_inches_marks() {
        assert!(approx_eq(height_to_cm("6'9\"").unwrap(), 205.74, 1e-9));
        assert!(approx_eq(height_to_cm("6' 10\"").unwrap(), 208.28, 1e-9));
        assert!(approx_eq(height_to_cm("7-0").unwrap(), 213.36, 1e-9));
    }

    #[test]
    fn malformed_heights_rejected() {
        for bad in ["", "6", "six-nine", "6-", "6-12", "6-101"] {
            let err = height_to_cm(bad).unwrap_err();
            assert_eq!(err.field(), Some("player.height"), "input {bad:?}");
        }
    }

    #[test]
    fn missing_combine_stays_none() {
        let physical = Physical::compute("6-9", None).unwrap();
        assert!(physical.wingspan.is_none());
        assert!(physical.vertical_leap.is_none());
    }

    #[test]
    fn partial_combine_keeps_what_was_measured() {
        let combine = DraftCombineMeasurements {
            player_id: PlayerId(1),
            wingspan: Some(214.0),
            vertical_leap: None,
        };
        let physical = Physical::compute("6-9", Some(&combine)).unwrap();
        assert_eq!(physical.wingspan, Some(214.0));
        assert!(physical.vertical_leap.is_none());
    }
}
