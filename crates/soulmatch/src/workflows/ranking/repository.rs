use chrono::{DateTime, Utc};

use super::domain::{RankingEntry, RankingPeriod};
use crate::workflows::RepositoryError;

/// Leaderboard storage.
pub trait RankingRepository: Send + Sync {
    /// Stores `entry`, failing with `Conflict` when the couple already holds a slot in that window.
    fn insert(&self, entry: RankingEntry) -> Result<RankingEntry, RepositoryError>;
    fn entries(
        &self,
        period: RankingPeriod,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<RankingEntry>, RepositoryError>;
}
