// Shot-distance splits: each bucket's share of the player's attempts.

use serde::Serialize;

use crate::error::StatsError;
use crate::model::ShotDistanceRow;

/// Attempt share for a single distance bucket, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotSplit {
    pub bucket: String,
    pub attempt_share: f64,
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `bucket.FGA * 100 / total_FGA`, rounded to two decimals, in the order the
/// rows were supplied. The comparator pairs buckets by position, so the
/// caller is responsible for a stable bucket ordering.
pub fn shot_splits(rows: &[ShotDistanceRow]) -> Result<Vec<ShotSplit>, StatsError> {
    for row in rows {
        if !row.fga.is_finite() || row.fga < 0.0 {
            return Err(StatsError::invalid(
                "shot_distance.fga",
                format!("bucket {:?} has invalid attempts {}", row.bucket, row.fga),
            ));
        }
    }

    let total: f64 = rows.iter().map(|r| r.fga).sum();
    if total <= 0.0 {
        return Err(StatsError::invalid(
            "shot_distance.fga",
            "no field-goal attempts across distance buckets",
        ));
    }

    Ok(rows
        .iter()
        .map(|row| ShotSplit {
            bucket: row.bucket.clone(),
            attempt_share: round_2dp(row.fga * 100.0 / total),
        })
        .collect())
}
