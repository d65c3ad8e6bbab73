use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compatibility::{
    AnalysisResult, BirthRecord, CompatibilityTier, PillarToken, TraitPenaltyVector,
};

/// Identifier wrapper for analysis requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

/// Opaque couple identifier owned by the pairing system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoupleId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CoupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One side of the pair: an optional display name plus the birth record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub birth: BirthRecord,
}

/// Caller supplied request to score a couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub couple_id: Option<CoupleId>,
    pub person1: Partner,
    pub person2: Partner,
}

/// Lifecycle of an analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "pending",
            AnalysisStatus::Processing => "processing",
            AnalysisStatus::Completed => "completed",
            AnalysisStatus::Failed => "failed",
        }
    }
}

/// Public projection of an analysis with the display names merged back in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_id: Option<CoupleId>,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person1_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person2_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<CompatibilityTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillars_person1: Option<PillarToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pillars_person2: Option<PillarToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_scores: Option<DetailedScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Dimension scores and trait penalties, grouped the way the stored payload nests them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedScores {
    pub sky_score: f64,
    pub earth_score: f64,
    pub person1_traits: TraitPenaltyVector,
    pub person2_traits: TraitPenaltyVector,
}

impl From<&AnalysisResult> for DetailedScores {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            sky_score: result.sky_score,
            earth_score: result.earth_score,
            person1_traits: result.trait_penalties_person1,
            person2_traits: result.trait_penalties_person2,
        }
    }
}

impl AnalysisView {
    /// View of a result that was never stored.
    pub fn preview(person1: &Partner, person2: &Partner, result: &AnalysisResult) -> Self {
        let mut view = Self::with_status(AnalysisStatus::Completed);
        view.person1_name = person1.name.clone();
        view.person2_name = person2.name.clone();
        view.attach_result(result);
        view
    }

    pub(crate) fn with_status(status: AnalysisStatus) -> Self {
        Self {
            request_id: None,
            couple_id: None,
            status: status.label(),
            person1_name: None,
            person2_name: None,
            compatibility_score: None,
            tier: None,
            interpretation: None,
            pillars_person1: None,
            pillars_person2: None,
            detailed_scores: None,
            created_at: None,
            completed_at: None,
        }
    }

    pub(crate) fn attach_result(&mut self, result: &AnalysisResult) {
        self.compatibility_score = Some(result.compatibility_score);
        self.tier = Some(result.tier);
        self.interpretation = Some(result.interpretation.clone());
        self.pillars_person1 = Some(result.pillars_person1);
        self.pillars_person2 = Some(result.pillars_person2);
        self.detailed_scores = Some(DetailedScores::from(result));
    }
}

/// Condensed history row for a couple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisHistoryEntry {
    pub request_id: RequestId,
    pub status: &'static str,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<String>,
}
