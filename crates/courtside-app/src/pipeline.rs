// Analysis pipeline: fetch a player-season's rows through a StatsProvider,
// run the metrics engine, and compare players.

use std::collections::HashMap;

use courtside_core::compare::{compare_with, rank_by_similarity, ComparatorOptions};
use courtside_core::metrics::{self, MetricsInput, PlayerSeasonMetrics};
use courtside_core::model::{PlayerBio, PlayerId, SeasonLabel};
use courtside_core::{SimilarityScore, StatsError};
use serde::Serialize;
use tracing::{debug, info};

use crate::provider::StatsProvider;

/// A named player-season with its computed metrics.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedPlayer {
    pub name: String,
    pub metrics: PlayerSeasonMetrics,
}

/// Result of comparing two player-seasons.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub a: AnalyzedPlayer,
    pub b: AnalyzedPlayer,
    pub similarity: SimilarityScore,
}

/// One ranked candidate from a similarity search.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub name: String,
    pub season: SeasonLabel,
    pub score: f64,
}

/// Compute metrics for a player id and season. Lookup misses come back as
/// `StatsError::NotFound`, unchanged.
pub fn analyze_player_id<P: StatsProvider + ?Sized>(
    provider: &P,
    player_id: PlayerId,
    season: SeasonLabel,
) -> Result<AnalyzedPlayer, StatsError> {
    let bio: PlayerBio = provider.player_bio(player_id)?;
    let stats = provider.player_season_stats(player_id, season)?;
    let team = provider.team_season_stats(stats.team_id, season)?;
    let league = provider.league_averages()?;
    let combine = provider.draft_combine(player_id, bio.debut_year)?;
    let shot_distance = provider.shot_distance_splits(player_id, season)?;

    if combine.is_none() {
        debug!(
            "no combine measurements for {} (debut {})",
            bio.full_name, bio.debut_year
        );
    }

    let metrics = metrics::compute(&MetricsInput {
        player: &stats,
        team: &team,
        league: &league,
        height: &bio.height,
        combine: combine.as_ref(),
        shot_distance: &shot_distance,
    })?;

    Ok(AnalyzedPlayer {
        name: bio.full_name,
        metrics,
    })
}

/// Resolve a full name, then compute that player's metrics for `season`.
pub fn analyze_player<P: StatsProvider + ?Sized>(
    provider: &P,
    full_name: &str,
    season: SeasonLabel,
) -> Result<AnalyzedPlayer, StatsError> {
    let player_id = provider.resolve_player_id(full_name)?;
    let analyzed = analyze_player_id(provider, player_id, season)?;
    info!(
        "analyzed {} {}: box creation {:.2}, offensive load {:.2}, usage {:.2}",
        analyzed.name,
        season,
        analyzed.metrics.box_creation,
        analyzed.metrics.offensive_load,
        analyzed.metrics.usage_rate
    );
    Ok(analyzed)
}

/// Analyze two player-seasons and score their similarity.
pub fn compare_players<P: StatsProvider + ?Sized>(
    provider: &P,
    options: &ComparatorOptions,
    a: (&str, SeasonLabel),
    b: (&str, SeasonLabel),
) -> Result<Comparison, StatsError> {
    let a = analyze_player(provider, a.0, a.1)?;
    let b = analyze_player(provider, b.0, b.1)?;
    let similarity = compare_with(&a.metrics, &b.metrics, options)?;
    info!(
        "{} vs {}: similarity {:.2}",
        a.name, b.name, similarity.score
    );
    Ok(Comparison { a, b, similarity })
}

/// Rank `candidates` by similarity to one target player-season, most
/// similar first. Candidates whose metrics cannot be computed are skipped;
/// the target itself is excluded.
pub fn find_similar<P: StatsProvider + ?Sized>(
    provider: &P,
    options: &ComparatorOptions,
    target: (&str, SeasonLabel),
    candidates: &[(PlayerId, SeasonLabel)],
    limit: usize,
) -> Result<Vec<RankedMatch>, StatsError> {
    let target = analyze_player(provider, target.0, target.1)?;

    let mut names: HashMap<PlayerId, String> = HashMap::new();
    let mut pool = Vec::new();
    for &(player_id, season) in candidates {
        if player_id == target.metrics.player_id && season == target.metrics.season {
            continue;
        }
        match analyze_player_id(provider, player_id, season) {
            Ok(analyzed) => {
                names.insert(player_id, analyzed.name);
                pool.push(analyzed.metrics);
            }
            Err(e) => debug!("skipping candidate {} {}: {}", player_id, season, e),
        }
    }

    let ranked = rank_by_similarity(&target.metrics, &pool, options);
    Ok(ranked
        .into_iter()
        .filter_map(|(metrics, score)| {
            let name = names.get(&metrics.player_id)?;
            Some(RankedMatch {
                name: name.clone(),
                season: metrics.season,
                score: score.score,
            })
        })
        .take(limit)
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
