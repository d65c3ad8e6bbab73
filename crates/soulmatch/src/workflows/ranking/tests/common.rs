use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::compatibility::{BirthRecord, CompatibilityEngine, Gender};
use crate::config::RankingConfig;
use crate::workflows::analysis::{
    AnalysisRecord, AnalysisRepository, AnalysisStatus, CoupleId, Partner, RequestId,
};
use crate::workflows::ranking::{RankingEntry, RankingPeriod, RankingRepository, RankingService};
use crate::workflows::RepositoryError;

pub(super) type Service = RankingService<SeededAnalyses, MemoryRankings>;

/// Wednesday 2025-03-12 15:30 UTC.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 15, 30, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn partner(year: i32, gender: Gender) -> Partner {
    Partner {
        name: None,
        birth: BirthRecord {
            year,
            month: 5,
            day: 15,
            hour: 14,
            gender,
        },
    }
}

/// Completed analysis for `couple` whose stored score is overridden to `score`.
pub(super) fn completed(request: &str, couple: Option<&str>, score: f64) -> AnalysisRecord {
    let person1 = partner(1995, Gender::Male);
    let person2 = partner(1997, Gender::Female);
    let mut result = CompatibilityEngine::default().analyze(&person1.birth, &person2.birth);
    result.compatibility_score = score;
    AnalysisRecord {
        request_id: RequestId(request.to_string()),
        couple_id: couple.map(|id| CoupleId(id.to_string())),
        person1,
        person2,
        status: AnalysisStatus::Completed,
        created_at: at(2025, 3, 1, 9),
        completed_at: Some(at(2025, 3, 1, 9)),
        result: Some(result),
    }
}

pub(super) fn pending(request: &str, couple: &str) -> AnalysisRecord {
    let mut record = completed(request, Some(couple), 0.0);
    record.status = AnalysisStatus::Processing;
    record.completed_at = None;
    record.result = None;
    record
}

pub(super) fn build_service(
    records: Vec<AnalysisRecord>,
    config: RankingConfig,
) -> (Service, Arc<MemoryRankings>) {
    let analyses = Arc::new(SeededAnalyses::with(records));
    let rankings = Arc::new(MemoryRankings::default());
    (
        RankingService::new(analyses, rankings.clone(), config),
        rankings,
    )
}

#[derive(Default)]
pub(super) struct SeededAnalyses {
    records: HashMap<RequestId, AnalysisRecord>,
}

impl SeededAnalyses {
    pub(super) fn with(records: Vec<AnalysisRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.request_id.clone(), record))
                .collect(),
        }
    }
}

impl AnalysisRepository for SeededAnalyses {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn update(&self, _record: AnalysisRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Ok(self.records.get(id).cloned())
    }

    fn for_couple(&self, couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Ok(self
            .records
            .values()
            .filter(|record| record.couple_id.as_ref() == Some(couple_id))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRankings {
    pub(super) entries: Arc<Mutex<Vec<RankingEntry>>>,
}

impl MemoryRankings {
    pub(super) fn len(&self) -> usize {
        self.entries.lock().expect("rankings mutex poisoned").len()
    }
}

impl RankingRepository for MemoryRankings {
    fn insert(&self, entry: RankingEntry) -> Result<RankingEntry, RepositoryError> {
        let mut guard = self.entries.lock().expect("rankings mutex poisoned");
        if guard.iter().any(|existing| {
            existing.couple_id == entry.couple_id
                && existing.period == entry.period
                && existing.period_start == entry.period_start
        }) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(entry.clone());
        Ok(entry)
    }

    fn entries(
        &self,
        period: RankingPeriod,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<RankingEntry>, RepositoryError> {
        let guard = self.entries.lock().expect("rankings mutex poisoned");
        Ok(guard
            .iter()
            .filter(|entry| entry.period == period && entry.period_start == period_start)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRankings;

impl RankingRepository for UnavailableRankings {
    fn insert(&self, _entry: RankingEntry) -> Result<RankingEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn entries(
        &self,
        _period: RankingPeriod,
        _period_start: DateTime<Utc>,
    ) -> Result<Vec<RankingEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
