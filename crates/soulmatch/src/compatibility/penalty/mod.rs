mod config;
mod rules;

pub use config::{PenaltyMagnitude, PenaltyWeights};
pub use rules::{PenaltyCategory, PenaltyRule, SixHarmRule, VoidRule};

use super::domain::{Gender, PillarToken, TraitPenaltyVector};

/// Applies an ordered list of penalty rules to a running score.
pub struct PenaltyEngine {
    weights: PenaltyWeights,
    rules: Vec<Box<dyn PenaltyRule>>,
}

impl PenaltyEngine {
    /// The void rule followed by the six-harm rule.
    pub fn standard(weights: PenaltyWeights) -> Self {
        Self::with_rules(weights, vec![Box::new(VoidRule), Box::new(SixHarmRule)])
    }

    pub fn with_rules(weights: PenaltyWeights, rules: Vec<Box<dyn PenaltyRule>>) -> Self {
        Self { weights, rules }
    }

    pub fn weights(&self) -> &PenaltyWeights {
        &self.weights
    }

    pub fn rule_categories(&self) -> Vec<PenaltyCategory> {
        self.rules.iter().map(|rule| rule.category()).collect()
    }

    /// Subtracts every firing penalty from `base_score`. The result is not clamped.
    ///
    /// Each rule runs for person 0 and then person 1 before the next rule starts.
    pub fn apply(
        &self,
        token0: &PillarToken,
        token1: &PillarToken,
        gender0: Gender,
        gender1: Gender,
        base_score: f64,
    ) -> PenaltyOutcome {
        let mut score = base_score;
        let mut traits = [TraitPenaltyVector::default(); 2];
        let people = [(token0, gender0), (token1, gender1)];

        for rule in &self.rules {
            let slot = rule.category().slot();
            for (index, (pillars, gender)) in people.iter().enumerate() {
                let penalty = rule.magnitude(*gender, &self.weights);
                for _ in 0..rule.firings(pillars) {
                    score -= penalty;
                    traits[index].add(slot, penalty);
                }
            }
        }

        let [person1, person2] = traits;
        PenaltyOutcome {
            score,
            person1,
            person2,
        }
    }
}

impl Default for PenaltyEngine {
    fn default() -> Self {
        Self::standard(PenaltyWeights::default())
    }
}

/// Penalized score and the per-person breakdown that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyOutcome {
    pub score: f64,
    pub person1: TraitPenaltyVector,
    pub person2: TraitPenaltyVector,
}
