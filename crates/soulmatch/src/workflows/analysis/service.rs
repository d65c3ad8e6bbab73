use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    AnalysisHistoryEntry, AnalysisStatus, AnalysisSubmission, CoupleId, Partner, RequestId,
};
use super::repository::{AnalysisRecord, AnalysisRepository};
use crate::compatibility::{AnalysisResult, CompatibilityEngine, ValidationError};
use crate::workflows::RepositoryError;

/// Service composing validation, the compatibility engine and the analysis repository.
pub struct AnalysisService<R> {
    repository: Arc<R>,
    engine: Arc<CompatibilityEngine>,
}

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RequestId(format!("req-{id:06}"))
}

/// Numeric part of a generated id; the zero padding stops at six digits.
fn request_sequence(id: &RequestId) -> Option<u64> {
    id.0.strip_prefix("req-")?.parse().ok()
}

impl<R> AnalysisService<R>
where
    R: AnalysisRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_engine(repository, Arc::new(CompatibilityEngine::default()))
    }

    pub fn with_engine(repository: Arc<R>, engine: Arc<CompatibilityEngine>) -> Self {
        Self { repository, engine }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Score a pair without storing anything.
    pub fn preview(
        &self,
        person1: &Partner,
        person2: &Partner,
    ) -> Result<AnalysisResult, AnalysisServiceError> {
        validate_pair(person1, person2)?;
        Ok(self.engine.analyze(&person1.birth, &person2.birth))
    }

    /// Validate, score and persist a new analysis, returning the completed record.
    pub fn submit(
        &self,
        submission: AnalysisSubmission,
    ) -> Result<AnalysisRecord, AnalysisServiceError> {
        let AnalysisSubmission {
            couple_id,
            person1,
            person2,
        } = submission;
        validate_pair(&person1, &person2)?;

        let record = AnalysisRecord {
            request_id: next_request_id(),
            couple_id,
            person1,
            person2,
            status: AnalysisStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
            result: None,
        };
        let mut record = self.repository.insert(record)?;

        record.status = AnalysisStatus::Processing;
        self.repository.update(record.clone())?;
        debug!(request_id = %record.request_id, "analysis processing");

        let result = self
            .engine
            .analyze(&record.person1.birth, &record.person2.birth);
        info!(
            request_id = %record.request_id,
            score = result.compatibility_score,
            tier = result.tier.label(),
            "analysis completed"
        );

        record.status = AnalysisStatus::Completed;
        record.completed_at = Some(Utc::now());
        record.result = Some(result);
        if let Err(err) = self.repository.update(record.clone()) {
            warn!(
                request_id = %record.request_id,
                error = %err,
                "failed to store analysis result"
            );
            record.status = AnalysisStatus::Failed;
            record.completed_at = None;
            record.result = None;
            if let Err(mark_err) = self.repository.update(record.clone()) {
                warn!(
                    request_id = %record.request_id,
                    error = %mark_err,
                    "failed to mark analysis as failed"
                );
            }
            return Err(err.into());
        }

        Ok(record)
    }

    /// Fetch a stored analysis.
    pub fn get(&self, request_id: &RequestId) -> Result<AnalysisRecord, AnalysisServiceError> {
        let record = self
            .repository
            .fetch(request_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// All analyses for a couple, newest first.
    pub fn history(
        &self,
        couple_id: &CoupleId,
    ) -> Result<Vec<AnalysisHistoryEntry>, AnalysisServiceError> {
        let mut records = self.repository.for_couple(couple_id)?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| {
                    request_sequence(&b.request_id).cmp(&request_sequence(&a.request_id))
                })
                .then_with(|| b.request_id.cmp(&a.request_id))
        });
        Ok(records.iter().map(AnalysisRecord::history_entry).collect())
    }
}

fn validate_pair(person1: &Partner, person2: &Partner) -> Result<(), AnalysisServiceError> {
    person1
        .birth
        .validate()
        .map_err(|source| AnalysisServiceError::Validation { person: 1, source })?;
    person2
        .birth
        .validate()
        .map_err(|source| AnalysisServiceError::Validation { person: 2, source })?;
    Ok(())
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("person {person}: {source}")]
    Validation {
        person: u8,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
