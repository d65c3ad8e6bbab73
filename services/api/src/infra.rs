use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use soulmatch::compatibility::{BirthRecord, Gender};
use soulmatch::workflows::analysis::{AnalysisRecord, AnalysisRepository, CoupleId, RequestId};
use soulmatch::workflows::ranking::{RankingEntry, RankingPeriod, RankingRepository};
use soulmatch::workflows::RepositoryError;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAnalysisRepository {
    records: Arc<Mutex<HashMap<RequestId, AnalysisRecord>>>,
}

impl AnalysisRepository for InMemoryAnalysisRepository {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.request_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.request_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: AnalysisRecord) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.contains_key(&record.request_id) {
            guard.insert(record.request_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &RequestId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.get(id).cloned())
    }

    fn for_couple(&self, couple_id: &CoupleId) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard
            .values()
            .filter(|record| record.couple_id.as_ref() == Some(couple_id))
            .cloned()
            .collect())
    }
}

type WindowKey = (RankingPeriod, DateTime<Utc>);

/// Entries bucketed by period window. Leaderboards only read the current
/// window, so buckets whose window closed before the newest insert are dropped.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRankingRepository {
    windows: Arc<Mutex<HashMap<WindowKey, Vec<RankingEntry>>>>,
}

impl RankingRepository for InMemoryRankingRepository {
    fn insert(&self, entry: RankingEntry) -> Result<RankingEntry, RepositoryError> {
        let mut guard = lock(&self.windows)?;
        guard.retain(|_, bucket| {
            bucket
                .first()
                .and_then(|existing| existing.period_end)
                .map_or(true, |end| end > entry.created_at)
        });
        let bucket = guard
            .entry((entry.period, entry.period_start))
            .or_default();
        if bucket
            .iter()
            .any(|existing| existing.couple_id == entry.couple_id)
        {
            return Err(RepositoryError::Conflict);
        }
        bucket.push(entry.clone());
        Ok(entry)
    }

    fn entries(
        &self,
        period: RankingPeriod,
        period_start: DateTime<Utc>,
    ) -> Result<Vec<RankingEntry>, RepositoryError> {
        let guard = lock(&self.windows)?;
        Ok(guard
            .get(&(period, period_start))
            .cloned()
            .unwrap_or_default())
    }
}

/// Parses `YYYY-MM-DD[THH],gender`, e.g. `1995-05-15T14,male`. Hour defaults to 0.
pub(crate) fn parse_birth(raw: &str) -> Result<BirthRecord, String> {
    let (moment, gender) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected YYYY-MM-DD[THH],gender but got '{raw}'"))?;
    let gender = gender
        .parse::<Gender>()
        .map_err(|err| err.to_string())?;

    let (date, hour) = match moment.trim().split_once(['T', 't', ' ']) {
        Some((date, hour)) => (date, number(hour, "hour")?),
        None => (moment.trim(), 0),
    };
    let mut parts = date.splitn(3, '-');
    let year = number(parts.next().unwrap_or_default(), "year")?;
    let month = number(parts.next().unwrap_or_default(), "month")?;
    let day = number(parts.next().unwrap_or_default(), "day")?;

    Ok(BirthRecord {
        year,
        month,
        day,
        hour,
        gender,
    })
}

fn number(raw: &str, field: &str) -> Result<i32, String> {
    raw.trim()
        .parse()
        .map_err(|err| format!("failed to parse {field} from '{raw}' ({err})"))
}
