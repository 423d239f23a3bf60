// Data-access seam between the analysis pipeline and whatever supplies
// tabulated stats rows.

use courtside_core::model::{
    DraftCombineMeasurements, LeagueAverageRates, PlayerBio, PlayerId, RawPlayerSeasonStats,
    RawTeamSeasonStats, SeasonLabel, ShotDistanceRow, TeamId,
};
use courtside_core::StatsError;

/// Supplies already-validated rows. Misses are reported as
/// `StatsError::NotFound` and passed through the pipeline untouched.
pub trait StatsProvider {
    /// Exact full-name match.
    fn resolve_player_id(&self, full_name: &str) -> Result<PlayerId, StatsError>;

    fn player_bio(&self, player: PlayerId) -> Result<PlayerBio, StatsError>;

    /// Fails with `NotFound` if the player did not play that season.
    fn player_season_stats(
        &self,
        player: PlayerId,
        season: SeasonLabel,
    ) -> Result<RawPlayerSeasonStats, StatsError>;

    fn team_season_stats(
        &self,
        team: TeamId,
        season: SeasonLabel,
    ) -> Result<RawTeamSeasonStats, StatsError>;

    /// Current league snapshot; not season-parameterized.
    fn league_averages(&self) -> Result<LeagueAverageRates, StatsError>;

    /// `Ok(None)` when the player never measured at the combine.
    fn draft_combine(
        &self,
        player: PlayerId,
        debut_year: i32,
    ) -> Result<Option<DraftCombineMeasurements>, StatsError>;

    /// Rows in the provider's fixed bucket order.
    fn shot_distance_splits(
        &self,
        player: PlayerId,
        season: SeasonLabel,
    ) -> Result<Vec<ShotDistanceRow>, StatsError>;
}
