use serde::{Deserialize, Serialize};

/// Six descending score bands, each inclusive on its lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompatibilityTier {
    Destined,
    High,
    Good,
    Fair,
    Average,
    Challenging,
}

impl CompatibilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            CompatibilityTier::Destined
        } else if score >= 80.0 {
            CompatibilityTier::High
        } else if score >= 70.0 {
            CompatibilityTier::Good
        } else if score >= 60.0 {
            CompatibilityTier::Fair
        } else if score >= 50.0 {
            CompatibilityTier::Average
        } else {
            CompatibilityTier::Challenging
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CompatibilityTier::Destined => "destined",
            CompatibilityTier::High => "high",
            CompatibilityTier::Good => "good",
            CompatibilityTier::Fair => "fair",
            CompatibilityTier::Average => "average",
            CompatibilityTier::Challenging => "challenging",
        }
    }

    pub const fn narrative(self) -> &'static str {
        match self {
            CompatibilityTier::Destined => {
                "Exceptional compatibility! A match made in heaven. You understand and respect each other and can keep a happy relationship."
            }
            CompatibilityTier::High => {
                "High compatibility! You suit each other well. A little effort can make the relationship complete."
            }
            CompatibilityTier::Good => {
                "Good compatibility! You are mostly in tune. Keep making the effort to understand each other."
            }
            CompatibilityTier::Fair => {
                "Fair compatibility. It takes some adjusting, but you can comfortably keep a good relationship."
            }
            CompatibilityTier::Average => {
                "Average compatibility. Accept your differences and work at it, and the relationship can grow."
            }
            CompatibilityTier::Challenging => {
                "Some aspects do not quite fit. Real affection and effort can still carry you through."
            }
        }
    }
}

/// Narrative text for a final score.
pub fn interpret(score: f64) -> &'static str {
    CompatibilityTier::from_score(score).narrative()
}
