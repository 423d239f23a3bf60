// Library root for the metric-computation and player-comparison core.
//
// Everything in here is a pure function of already-fetched rows: no I/O,
// no retries, no shared state between calls.

pub mod compare;
pub mod error;
pub mod metrics;
pub mod model;

pub use compare::{compare, ComparatorOptions, ScoreNormalization, SimilarityScore};
pub use error::StatsError;
pub use metrics::{MetricsInput, PlayerSeasonMetrics};
