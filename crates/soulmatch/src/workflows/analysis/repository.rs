use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AnalysisHistoryEntry, AnalysisStatus, AnalysisView, CoupleId, Partner, RequestId,
};
use crate::compatibility::AnalysisResult;
use crate::workflows::RepositoryError;

/// Repository record containing the submitted pair, lifecycle status and result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub request_id: RequestId,
    pub couple_id: Option<CoupleId>,
    pub person1: Partner,
    pub person2: Partner,
    pub status: AnalysisStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub result: Option<AnalysisResult>,
}

impl AnalysisRecord {
    pub fn view(&self) -> AnalysisView {
        let mut view = AnalysisView::with_status(self.status);
        view.request_id = Some(self.request_id.clone());
        view.couple_id = self.couple_id.clone();
        view.person1_name = self.person1.name.clone();
        view.person2_name = self.person2.name.clone();
        view.created_at = Some(self.created_at);
        view.completed_at = self.completed_at;
        if let Some(result) = &self.result {
            view.attach_result(result);
        }
        view
    }

    pub fn history_entry(&self) -> AnalysisHistoryEntry {
        AnalysisHistoryEntry {
            request_id: self.request_id.clone(),
            status: self.status.label(),
            created_at: self.created_at,
            completed_at: self.completed_at,
            compatibility_score: self.result.as_ref().map(|result| result.compatibility_score),
            interpretation: self
                .result
                .as_ref()
                .map(|result| result.interpretation.clone()),
        }
    }
}

/// Storage abstraction so the analysis service can be exercised in isolation.
pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError>;
    /// All records for a couple, in any order.
    fn for_couple(&self, couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError>;
}
