use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::compatibility::{BirthRecord, Gender};
use crate::workflows::analysis::domain::{AnalysisSubmission, CoupleId, Partner, RequestId};
use crate::workflows::analysis::repository::{AnalysisRecord, AnalysisRepository};
use crate::workflows::analysis::{analysis_router, AnalysisService};
use crate::workflows::RepositoryError;

pub(super) fn partner(
    name: &str,
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    gender: Gender,
) -> Partner {
    Partner {
        name: Some(name.to_string()),
        birth: BirthRecord {
            year,
            month,
            day,
            hour,
            gender,
        },
    }
}

pub(super) fn groom() -> Partner {
    partner("Minjun", 1995, 5, 15, 14, Gender::Male)
}

pub(super) fn bride() -> Partner {
    partner("Seoyeon", 1997, 8, 20, 9, Gender::Female)
}

pub(super) fn submission(couple: Option<&str>) -> AnalysisSubmission {
    AnalysisSubmission {
        couple_id: couple.map(|id| CoupleId(id.to_string())),
        person1: groom(),
        person2: bride(),
    }
}

pub(super) fn invalid_submission() -> AnalysisSubmission {
    let mut submission = submission(None);
    submission.person2.birth.month = 13;
    submission
}

pub(super) fn build_service() -> (AnalysisService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    (AnalysisService::new(repository.clone()), repository)
}

pub(super) fn router_with_service(service: AnalysisService<MemoryRepository>) -> axum::Router {
    analysis_router(Arc::new(service))
}

/// Keeps every write so lifecycle transitions can be asserted.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<RequestId, AnalysisRecord>>>,
    pub(super) writes: Arc<Mutex<Vec<AnalysisRecord>>>,
}

impl MemoryRepository {
    pub(super) fn write_statuses(&self) -> Vec<&'static str> {
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .iter()
            .map(|record| record.status.label())
            .collect()
    }
}

impl AnalysisRepository for MemoryRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.request_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.request_id.clone(), record.clone());
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.request_id.clone(), record.clone());
        self.writes
            .lock()
            .expect("writes mutex poisoned")
            .push(record);
        Ok(())
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn for_couple(&self, couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.couple_id.as_ref() == Some(couple_id))
            .cloned()
            .collect())
    }
}

pub(super) struct ConflictRepository;

impl AnalysisRepository for ConflictRepository {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(None)
    }

    fn for_couple(&self, _couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// Rejects the n-th `update` (1-based) and delegates everything else.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    pub(super) fail_on_update: usize,
    updates: AtomicUsize,
}

impl FlakyRepository {
    pub(super) fn failing_update(fail_on_update: usize) -> Self {
        Self {
            fail_on_update,
            ..Self::default()
        }
    }
}

impl AnalysisRepository for FlakyRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let attempt = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt == self.fail_on_update {
            return Err(RepositoryError::Unavailable("write timed out".to_string()));
        }
        self.inner.update(record)
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn for_couple(&self, couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        self.inner.for_couple(couple_id)
    }
}

pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_couple(&self, _couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
