use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::analysis::{CoupleId, RequestId};

/// Longest accepted intro message, counted in characters.
pub const MAX_INTRO_CHARS: usize = 200;

/// Leaderboard horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPeriod {
    Daily,
    Weekly,
    Monthly,
    AllTime,
}

impl RankingPeriod {
    pub const ALL: [RankingPeriod; 4] = [
        RankingPeriod::Daily,
        RankingPeriod::Weekly,
        RankingPeriod::Monthly,
        RankingPeriod::AllTime,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RankingPeriod::Daily => "daily",
            RankingPeriod::Weekly => "weekly",
            RankingPeriod::Monthly => "monthly",
            RankingPeriod::AllTime => "all_time",
        }
    }

    /// Window of this period containing `now`. Weeks start on Monday; all-time starts at the Unix epoch.
    pub fn window(self, now: DateTime<Utc>) -> PeriodWindow {
        let today = now.date_naive();
        match self {
            RankingPeriod::Daily => PeriodWindow::bounded(today, today + Duration::days(1)),
            RankingPeriod::Weekly => {
                let monday =
                    today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                PeriodWindow::bounded(monday, monday + Duration::days(7))
            }
            RankingPeriod::Monthly => {
                let first = today - Duration::days(i64::from(today.day0()));
                // 31 days past the first always lands early in the following month.
                let next_month = first + Duration::days(31);
                let next_first = next_month - Duration::days(i64::from(next_month.day0()));
                PeriodWindow::bounded(first, next_first)
            }
            RankingPeriod::AllTime => PeriodWindow {
                start: DateTime::<Utc>::default(),
                end: None,
            },
        }
    }
}

impl fmt::Display for RankingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ranking period `{0}`")]
pub struct UnknownPeriod(pub String);

impl FromStr for RankingPeriod {
    type Err = UnknownPeriod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(RankingPeriod::Daily),
            "weekly" => Ok(RankingPeriod::Weekly),
            "monthly" => Ok(RankingPeriod::Monthly),
            "all_time" | "all-time" | "alltime" => Ok(RankingPeriod::AllTime),
            _ => Err(UnknownPeriod(value.to_string())),
        }
    }
}

/// Half-open `[start, end)` interval; an open end never closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl PeriodWindow {
    fn bounded(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: midnight(start),
            end: Some(midnight(end)),
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && self.end.map_or(true, |end| instant < end)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Request to place a completed analysis on a leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRegistration {
    pub request_id: RequestId,
    pub period: RankingPeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_message: Option<String>,
}

/// Stored leaderboard entry. At most one per couple, period and window start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub entry_id: String,
    pub couple_id: CoupleId,
    pub request_id: RequestId,
    pub period: RankingPeriod,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_message: Option<String>,
    pub period_start: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub entry: RankingEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardView {
    pub period: RankingPeriod,
    pub period_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_end: Option<DateTime<Utc>>,
    pub total_entries: usize,
    pub rankings: Vec<RankedEntry>,
}
