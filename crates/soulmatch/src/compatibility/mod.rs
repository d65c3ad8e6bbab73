//! Birth-pillar compatibility scoring.
//!
//! Two birth records are encoded into pillar tokens, their year tokens are scored on the
//! sky and earth tables, the averaged base score is reduced by per-person penalty rules,
//! and the clamped result is mapped to a narrative tier. Everything here is pure and
//! synchronous, so a single engine can be shared across request handlers.

pub mod domain;
pub mod interpretation;
pub mod penalty;
pub mod pillars;
pub mod scoring;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisResult, BirthRecord, Gender, PillarToken, TraitPenaltyVector, UnknownGender,
    TRAIT_SLOTS,
};
pub use interpretation::{interpret, CompatibilityTier};
pub use penalty::{
    PenaltyCategory, PenaltyEngine, PenaltyMagnitude, PenaltyOutcome, PenaltyRule, PenaltyWeights,
};
pub use pillars::encode;
pub use scoring::{earth_score, sky_score, Dimension, DimensionModel, ModelVerdict};
pub use validation::ValidationError;

use std::sync::Arc;

/// Stateless scorer combining the pillar encoder, lookup tables and penalty rules.
pub struct CompatibilityEngine {
    penalties: PenaltyEngine,
    model: Option<Arc<dyn DimensionModel>>,
}

impl CompatibilityEngine {
    pub fn new(weights: PenaltyWeights) -> Self {
        Self {
            penalties: PenaltyEngine::standard(weights),
            model: None,
        }
    }

    /// Consults `model` before the lookup tables; untrained verdicts fall back to the tables.
    pub fn with_model(mut self, model: Arc<dyn DimensionModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_penalties(mut self, penalties: PenaltyEngine) -> Self {
        self.penalties = penalties;
        self
    }

    pub fn analyze(&self, birth1: &BirthRecord, birth2: &BirthRecord) -> AnalysisResult {
        let pillars1 = encode(birth1);
        let pillars2 = encode(birth2);

        let model = self.model.as_deref();
        let sky = scoring::score_dimension(
            model,
            Dimension::Sky,
            pillars1.year_sky,
            pillars2.year_sky,
        );
        let earth = scoring::score_dimension(
            model,
            Dimension::Earth,
            pillars1.year_earth,
            pillars2.year_earth,
        );
        let base_score = ((sky + earth) / 2.0) * 100.0;

        let outcome = self.penalties.apply(
            &pillars1,
            &pillars2,
            birth1.gender,
            birth2.gender,
            base_score,
        );

        let compatibility_score = finalize_score(outcome.score);
        let tier = CompatibilityTier::from_score(compatibility_score);

        AnalysisResult {
            compatibility_score,
            pillars_person1: pillars1,
            pillars_person2: pillars2,
            sky_score: sky,
            earth_score: earth,
            trait_penalties_person1: outcome.person1,
            trait_penalties_person2: outcome.person2,
            tier,
            interpretation: tier.narrative().to_string(),
        }
    }
}

impl Default for CompatibilityEngine {
    fn default() -> Self {
        Self::new(PenaltyWeights::default())
    }
}

/// Scores two birth records with the lookup tables and the standard penalty rules.
pub fn analyze(birth1: &BirthRecord, birth2: &BirthRecord) -> AnalysisResult {
    CompatibilityEngine::default().analyze(birth1, birth2)
}

/// Clamps to `[0, 100]` and rounds to two decimals.
pub(crate) fn finalize_score(score: f64) -> f64 {
    let clamped = score.clamp(0.0, 100.0);
    (clamped * 100.0).round() / 100.0
}
