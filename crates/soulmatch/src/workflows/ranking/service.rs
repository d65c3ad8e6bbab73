use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{
    LeaderboardView, RankedEntry, RankingEntry, RankingPeriod, RankingRegistration,
    MAX_INTRO_CHARS,
};
use super::repository::RankingRepository;
use crate::config::RankingConfig;
use crate::workflows::analysis::{AnalysisRepository, AnalysisStatus, RequestId};
use crate::workflows::RepositoryError;

/// Places completed analyses on period leaderboards and reads them back.
pub struct RankingService<A, K> {
    analyses: Arc<A>,
    rankings: Arc<K>,
    config: RankingConfig,
}

static ENTRY_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_entry_id() -> String {
    let id = ENTRY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("rank-{id:06}")
}

impl<A, K> RankingService<A, K>
where
    A: AnalysisRepository + 'static,
    K: RankingRepository + 'static,
{
    pub fn new(analyses: Arc<A>, rankings: Arc<K>, config: RankingConfig) -> Self {
        Self {
            analyses,
            rankings,
            config,
        }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn register(
        &self,
        registration: RankingRegistration,
        now: DateTime<Utc>,
    ) -> Result<RankingEntry, RankingError> {
        let RankingRegistration {
            request_id,
            period,
            intro_message,
        } = registration;

        if let Some(message) = &intro_message {
            let length = message.chars().count();
            if length > MAX_INTRO_CHARS {
                return Err(RankingError::IntroTooLong { length });
            }
        }

        let record = self
            .analyses
            .fetch(&request_id)?
            .ok_or(RepositoryError::NotFound)?;
        let score = match (&record.status, &record.result) {
            (AnalysisStatus::Completed, Some(result)) => result.compatibility_score,
            _ => return Err(RankingError::NotCompleted(request_id)),
        };
        let couple_id = record
            .couple_id
            .ok_or_else(|| RankingError::Unpaired(request_id.clone()))?;

        let window = period.window(now);
        let entry = RankingEntry {
            entry_id: next_entry_id(),
            couple_id,
            request_id,
            period,
            score,
            intro_message,
            period_start: window.start,
            period_end: window.end,
            created_at: now,
        };
        let entry = self.rankings.insert(entry)?;
        info!(
            entry_id = %entry.entry_id,
            couple_id = %entry.couple_id,
            period = period.label(),
            score = entry.score,
            "ranking entry registered"
        );
        Ok(entry)
    }

    /// Current window of `period`, best score first. Ties go to the earlier registration.
    pub fn leaderboard(
        &self,
        period: RankingPeriod,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<LeaderboardView, RankingError> {
        let cap = self.config.limit_for(period);
        let limit = limit.map_or(cap, |requested| requested.min(cap));
        let window = period.window(now);

        let mut entries = self.rankings.entries(period, window.start)?;
        entries.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.entry_id.cmp(&b.entry_id))
        });
        let total_entries = entries.len();
        debug!(period = period.label(), total_entries, limit, "leaderboard read");

        let rankings = entries
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, entry)| RankedEntry {
                rank: index + 1,
                entry,
            })
            .collect();

        Ok(LeaderboardView {
            period,
            period_start: window.start,
            period_end: window.end,
            total_entries,
            rankings,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RankingError {
    #[error("analysis {0} has no couple attached")]
    Unpaired(RequestId),
    #[error("analysis {0} is not completed")]
    NotCompleted(RequestId),
    #[error("intro message is {length} characters; at most 200 allowed")]
    IntroTooLong { length: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
