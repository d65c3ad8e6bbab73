use serde::{Deserialize, Serialize};

use super::super::domain::Gender;

/// Gender-dependent magnitude of a penalty rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyMagnitude {
    pub male: f64,
    pub female: f64,
}

impl PenaltyMagnitude {
    pub const fn for_gender(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }
}

/// Weights for the active penalty rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    pub void: PenaltyMagnitude,
    pub six_harm: PenaltyMagnitude,
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            void: PenaltyMagnitude {
                male: 8.0,
                female: 9.5,
            },
            six_harm: PenaltyMagnitude {
                male: 7.0,
                female: 8.2,
            },
        }
    }
}
