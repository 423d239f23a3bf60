// Player comparison: min/max ratios over scalar metrics plus the averaged
// shot-distance split ratio, folded into one similarity score.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatsError;
use crate::metrics::PlayerSeasonMetrics;

// ---------------------------------------------------------------------------
// Scalar metrics
// ---------------------------------------------------------------------------

/// Scalar metrics paired between two players, in accumulation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarMetric {
    ShootingQuality,
    BoxCreation,
    OffensiveLoad,
    UsageRate,
    Height,
    Wingspan,
    Spacing,
}

impl ScalarMetric {
    pub const ALL: [ScalarMetric; 7] = [
        ScalarMetric::ShootingQuality,
        ScalarMetric::BoxCreation,
        ScalarMetric::OffensiveLoad,
        ScalarMetric::UsageRate,
        ScalarMetric::Height,
        ScalarMetric::Wingspan,
        ScalarMetric::Spacing,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScalarMetric::ShootingQuality => "shooting quality",
            ScalarMetric::BoxCreation => "box creation",
            ScalarMetric::OffensiveLoad => "offensive load",
            ScalarMetric::UsageRate => "usage rate",
            ScalarMetric::Height => "height",
            ScalarMetric::Wingspan => "wingspan",
            ScalarMetric::Spacing => "spacing",
        }
    }

    /// The metric's value, or `None` when the measurement is unavailable.
    pub fn value(&self, m: &PlayerSeasonMetrics) -> Option<f64> {
        match self {
            ScalarMetric::ShootingQuality => Some(m.shooting_quality()),
            ScalarMetric::BoxCreation => Some(m.box_creation),
            ScalarMetric::OffensiveLoad => Some(m.offensive_load),
            ScalarMetric::UsageRate => Some(m.usage_rate),
            ScalarMetric::Height => Some(m.height_cm()),
            ScalarMetric::Wingspan => m.wingspan(),
            ScalarMetric::Spacing => Some(m.spacing()),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How the summed ratios are turned into the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreNormalization {
    /// Divide by the number of scalar ratios only. The splits ratio is still
    /// added to the numerator, so identical players score above 100.
    #[default]
    ScalarCount,
    /// Divide by scalar ratios plus the splits term; identical players score 100.
    AllTerms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparatorOptions {
    /// Truncate both scalar values to integers before taking the ratio.
    pub truncate_scalars: bool,
    pub normalization: ScoreNormalization,
    /// Leave buckets where neither player attempted a shot out of the
    /// splits average. Otherwise each such bucket counts as a full 100.
    pub skip_empty_buckets: bool,
}

impl Default for ComparatorOptions {
    fn default() -> Self {
        ComparatorOptions {
            truncate_scalars: true,
            normalization: ScoreNormalization::ScalarCount,
            skip_empty_buckets: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// One scalar metric's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricRatio {
    pub metric: ScalarMetric,
    /// Values after optional truncation.
    pub a: f64,
    pub b: f64,
    pub ratio: f64,
}

/// Similarity between two player-seasons, with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityScore {
    pub score: f64,
    pub scalar_ratios: Vec<MetricRatio>,
    pub splits_ratio: f64,
    /// Metrics left out because either side lacked the measurement.
    pub skipped: Vec<ScalarMetric>,
    pub divisor: usize,
}

impl SimilarityScore {
    pub fn ratio_for(&self, metric: ScalarMetric) -> Option<f64> {
        self.scalar_ratios
            .iter()
            .find(|r| r.metric == metric)
            .map(|r| r.ratio)
    }
}

/// `min(a, b) / max(a, b) * 100`, kept on a 0..=100 scale.
///
/// Equal values (including both zero) give 100. Unequal values with a zero
/// maximum give 0. Two negative values are compared by magnitude; a pair
/// with opposite signs gives 0.
pub fn ratio(a: f64, b: f64) -> f64 {
    if a == b {
        return 100.0;
    }
    match (a < 0.0, b < 0.0) {
        (true, true) => return ratio(-a, -b),
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    if hi == 0.0 {
        return 0.0;
    }
    lo / hi * 100.0
}

/// Elementwise ratio over two aligned split sequences, averaged.
pub fn splits_ratio(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    if a.len() != b.len() {
        return Err(StatsError::invalid(
            "splits",
            format!("length mismatch: {} vs {}", a.len(), b.len()),
        ));
    }
    if a.is_empty() {
        return Err(StatsError::invalid("splits", "no distance buckets to compare"));
    }
    let sum: f64 = a.iter().zip(b).map(|(x, y)| ratio(*x, *y)).sum();
    Ok(sum / a.len() as f64)
}

/// Like [`splits_ratio`], but buckets that are zero on both sides are left
/// out of the average. Two all-zero sequences give 100.
pub fn splits_ratio_skipping_empty(a: &[f64], b: &[f64]) -> Result<f64, StatsError> {
    splits_ratio(a, b)?;
    let ratios: Vec<f64> = a
        .iter()
        .zip(b)
        .filter(|(x, y)| !(**x == 0.0 && **y == 0.0))
        .map(|(x, y)| ratio(*x, *y))
        .collect();
    if ratios.is_empty() {
        return Ok(100.0);
    }
    Ok(ratios.iter().sum::<f64>() / ratios.len() as f64)
}

/// Compare two player-seasons with the default options.
pub fn compare(
    a: &PlayerSeasonMetrics,
    b: &PlayerSeasonMetrics,
) -> Result<SimilarityScore, StatsError> {
    compare_with(a, b, &ComparatorOptions::default())
}

/// Compare two player-seasons.
///
/// Each scalar metric present on both sides contributes one ratio; a metric
/// missing on either side is skipped and the divisor shrinks with it. The
/// averaged splits ratio adds one more term to the numerator.
pub fn compare_with(
    a: &PlayerSeasonMetrics,
    b: &PlayerSeasonMetrics,
    options: &ComparatorOptions,
) -> Result<SimilarityScore, StatsError> {
    let (shares_a, shares_b) = (a.split_shares(), b.split_shares());
    let splits_ratio = if options.skip_empty_buckets {
        splits_ratio_skipping_empty(&shares_a, &shares_b)?
    } else {
        splits_ratio(&shares_a, &shares_b)?
    };

    let mut scalar_ratios = Vec::with_capacity(ScalarMetric::ALL.len());
    let mut skipped = Vec::new();
    for metric in ScalarMetric::ALL {
        let (Some(va), Some(vb)) = (metric.value(a), metric.value(b)) else {
            skipped.push(metric);
            continue;
        };
        let (va, vb) = if options.truncate_scalars {
            (va.trunc(), vb.trunc())
        } else {
            (va, vb)
        };
        scalar_ratios.push(MetricRatio {
            metric,
            a: va,
            b: vb,
            ratio: ratio(va, vb),
        });
    }

    let divisor = match options.normalization {
        ScoreNormalization::ScalarCount => scalar_ratios.len(),
        ScoreNormalization::AllTerms => scalar_ratios.len() + 1,
    };
    let total: f64 = scalar_ratios.iter().map(|r| r.ratio).sum::<f64>() + splits_ratio;
    let score = total / divisor as f64;

    debug!(
        a = %a.player_id,
        b = %b.player_id,
        score,
        splits_ratio,
        skipped = skipped.len(),
        "compared player-seasons"
    );

    Ok(SimilarityScore {
        score,
        scalar_ratios,
        splits_ratio,
        skipped,
        divisor,
    })
}

/// Score every candidate against `target` and return them most similar
/// first. Candidates that cannot be compared are logged and left out.
pub fn rank_by_similarity<'a>(
    target: &PlayerSeasonMetrics,
    candidates: &'a [PlayerSeasonMetrics],
    options: &ComparatorOptions,
) -> Vec<(&'a PlayerSeasonMetrics, SimilarityScore)> {
    let mut ranked: Vec<(&PlayerSeasonMetrics, SimilarityScore)> = candidates
        .iter()
        .filter_map(|candidate| match compare_with(target, candidate, options) {
            Ok(score) => Some((candidate, score)),
            Err(e) => {
                warn!(
                    "skipping candidate {} ({}): {}",
                    candidate.player_id, candidate.season, e
                );
                None
            }
        })
        .collect();

    ranked.sort_by(|x, y| {
        y.1.score
            .partial_cmp(&x.1.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
