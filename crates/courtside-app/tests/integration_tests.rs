// Integration tests for courtside.
//
// These load the CSV fixtures through the public API and run the metrics
// and comparison pipeline end to end.

use std::path::PathBuf;

use courtside_app::config::DataFiles;
use courtside_app::dataset::{Dataset, DatasetError, SHOT_DISTANCE_BUCKETS};
use courtside_app::pipeline;
use courtside_app::provider::StatsProvider;
use courtside_core::compare::{ComparatorOptions, ScalarMetric, ScoreNormalization};
use courtside_core::model::{PlayerId, SeasonLabel};
use courtside_core::StatsError;

// ===========================================================================
// Test helpers
// ===========================================================================

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn dataset() -> Dataset {
    Dataset::load(&fixtures(), &DataFiles::default()).expect("fixtures should load")
}

fn season(label: &str) -> SeasonLabel {
    SeasonLabel::parse(label).unwrap()
}

fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

// ===========================================================================
// Dataset loading
// ===========================================================================

#[test]
fn fixtures_load_and_skip_bad_rows() {
    let data = dataset();
    assert_eq!(data.player_count(), 3);
    // The "2019-2020" row is rejected; four valid player-seasons remain.
    assert_eq!(
        data.player_season_keys(),
        vec![
            (PlayerId(1001), season("2019-20")),
            (PlayerId(1001), season("2020-21")),
            (PlayerId(1002), season("2019-20")),
            (PlayerId(1003), season("2019-20")),
        ]
    );
}

#[test]
fn shot_distance_aligned_to_bucket_order() {
    let data = dataset();
    let rows = data
        .shot_distance_splits(PlayerId(1003), season("2019-20"))
        .unwrap();
    let buckets: Vec<&str> = rows.iter().map(|r| r.bucket.as_str()).collect();
    assert_eq!(buckets, SHOT_DISTANCE_BUCKETS.to_vec());
    // The unknown "Backcourt" bucket is dropped.
    let total: f64 = rows.iter().map(|r| r.fga).sum();
    assert!(approx_eq(total, 18.0, 1e-12));
}

#[test]
fn missing_file_is_io_error() {
    let files = DataFiles {
        players: "no_such_file.csv".into(),
        ..DataFiles::default()
    };
    let err = Dataset::load(&fixtures(), &files).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn absent_combine_file_is_optional() {
    let files = DataFiles {
        draft_combine: "no_combine_export.csv".into(),
        ..DataFiles::default()
    };
    let data = Dataset::load(&fixtures(), &files).unwrap();
    let analyzed = pipeline::analyze_player(&data, "Alpha Guard", season("2019-20")).unwrap();
    assert_eq!(analyzed.metrics.wingspan(), None);
    assert_eq!(analyzed.metrics.physical.vertical_leap, None);
}

// ===========================================================================
// Metrics pipeline
// ===========================================================================

#[test]
fn end_to_end_metrics() {
    let data = dataset();
    let analyzed = pipeline::analyze_player(&data, "Alpha Guard", season("2019-20")).unwrap();
    let m = &analyzed.metrics;

    assert!(approx_eq(m.team_possessions, 96.6528, 1e-9));
    assert!(approx_eq(m.per_100.ast, 5.173155873394252, 1e-9));
    assert!(approx_eq(m.per_100.pts, 25.865779366971264, 1e-9));
    assert!(approx_eq(m.box_creation, 4.81187444574363, 1e-9));
    assert!(approx_eq(m.offensive_load, 33.49928321751376, 1e-9));
    assert!(approx_eq(m.usage_rate, 30.153702247071575, 1e-9));
    assert!(approx_eq(m.spacing(), 2.02, 1e-9));
    assert!(approx_eq(m.shooting_quality(), 74.38666666666667, 1e-9));
    assert!(approx_eq(m.height_cm(), 205.74, 1e-9));
    assert_eq!(m.wingspan(), Some(213.0));
    assert_eq!(m.physical.vertical_leap, Some(86.0));

    assert_eq!(m.splits.len(), SHOT_DISTANCE_BUCKETS.len());
    assert_eq!(
        m.split_shares(),
        vec![33.33, 0.0, 0.0, 22.22, 0.0, 44.44, 0.0, 0.0, 0.0]
    );
}

#[test]
fn blank_wingspan_cell_is_missing() {
    let data = dataset();
    let analyzed = pipeline::analyze_player(&data, "Beta Wing", season("2019-20")).unwrap();
    assert_eq!(analyzed.metrics.wingspan(), None);
    assert_eq!(analyzed.metrics.physical.vertical_leap, Some(80.5));
}

#[test]
fn unknown_player_not_found() {
    let data = dataset();
    let err = pipeline::analyze_player(&data, "Delta Nobody", season("2019-20")).unwrap_err();
    assert!(matches!(err, StatsError::NotFound { .. }));
}

#[test]
fn season_not_played_not_found() {
    let data = dataset();
    let err = pipeline::analyze_player(&data, "Gamma Big", season("2020-21")).unwrap_err();
    assert!(matches!(err, StatsError::NotFound { .. }));
}

#[test]
fn metrics_serialize_to_json() {
    let data = dataset();
    let analyzed = pipeline::analyze_player(&data, "Alpha Guard", season("2019-20")).unwrap();
    let json = serde_json::to_value(&analyzed).unwrap();
    assert_eq!(json["name"], "Alpha Guard");
    assert_eq!(json["metrics"]["season"], "2019-20");
    assert!(json["metrics"]["splits"].is_array());
}

// ===========================================================================
// Comparison
// ===========================================================================

#[test]
fn self_comparison() {
    let data = dataset();
    let s = season("2019-20");

    let default = pipeline::compare_players(
        &data,
        &ComparatorOptions::default(),
        ("Alpha Guard", s),
        ("Alpha Guard", s),
    )
    .unwrap();
    assert!(approx_eq(default.similarity.score, 800.0 / 7.0, 1e-9));
    assert!(approx_eq(default.similarity.splits_ratio, 100.0, 1e-12));

    let all_terms = ComparatorOptions {
        normalization: ScoreNormalization::AllTerms,
        ..ComparatorOptions::default()
    };
    let exact =
        pipeline::compare_players(&data, &all_terms, ("Alpha Guard", s), ("Alpha Guard", s))
            .unwrap();
    assert!(approx_eq(exact.similarity.score, 100.0, 1e-9));
}

#[test]
fn missing_wingspan_shrinks_divisor() {
    let data = dataset();
    let s = season("2019-20");
    let c = pipeline::compare_players(
        &data,
        &ComparatorOptions::default(),
        ("Alpha Guard", s),
        ("Beta Wing", s),
    )
    .unwrap();

    assert_eq!(c.similarity.divisor, 6);
    assert_eq!(c.similarity.skipped, vec![ScalarMetric::Wingspan]);
    assert_eq!(c.similarity.ratio_for(ScalarMetric::Wingspan), None);
    // Identical shooting inputs and truncation make these exact.
    assert_eq!(c.similarity.ratio_for(ScalarMetric::UsageRate), Some(100.0));
    assert_eq!(c.similarity.ratio_for(ScalarMetric::Spacing), Some(100.0));
}

#[test]
fn comparison_is_symmetric() {
    let data = dataset();
    let s = season("2019-20");
    let options = ComparatorOptions::default();
    let ab = pipeline::compare_players(&data, &options, ("Alpha Guard", s), ("Gamma Big", s))
        .unwrap();
    let ba = pipeline::compare_players(&data, &options, ("Gamma Big", s), ("Alpha Guard", s))
        .unwrap();
    assert!(approx_eq(ab.similarity.score, ba.similarity.score, 1e-9));
}

#[test]
fn similar_players_ranked() {
    let data = dataset();
    let matches = pipeline::find_similar(
        &data,
        &ComparatorOptions::default(),
        ("Alpha Guard", season("2019-20")),
        &data.player_season_keys(),
        5,
    )
    .unwrap();

    let ranked: Vec<(&str, SeasonLabel)> =
        matches.iter().map(|m| (m.name.as_str(), m.season)).collect();
    assert_eq!(
        ranked,
        vec![
            ("Alpha Guard", season("2020-21")),
            ("Beta Wing", season("2019-20")),
            ("Gamma Big", season("2019-20")),
        ]
    );
}
