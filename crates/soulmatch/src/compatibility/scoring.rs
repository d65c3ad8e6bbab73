//! Pairwise sky/earth scoring.
//!
//! The lookup tables are the authoritative scorer. A [`DimensionModel`] may be plugged in
//! ahead of them, but its output is only trusted when it reports a confident verdict.

use serde::{Deserialize, Serialize};

/// Lowest model prediction accepted as a real score.
pub const MODEL_FLOOR: f64 = 0.01;
/// Highest model prediction accepted as a real score.
pub const MODEL_CEILING: f64 = 0.99;

/// The two scored dimensions of a pillar pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Sky,
    Earth,
}

impl Dimension {
    pub const fn label(self) -> &'static str {
        match self {
            Dimension::Sky => "sky",
            Dimension::Earth => "earth",
        }
    }
}

/// Outcome of asking a model for a dimension score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelVerdict {
    Confident(f64),
    Untrained,
}

impl ModelVerdict {
    /// Clamps a raw prediction into `[0, 1]` and accepts it only inside
    /// `[MODEL_FLOOR, MODEL_CEILING]`.
    pub fn from_prediction(raw: f64) -> Self {
        if !raw.is_finite() {
            return ModelVerdict::Untrained;
        }

        let score = raw.clamp(0.0, 1.0);
        if !(MODEL_FLOOR..=MODEL_CEILING).contains(&score) {
            ModelVerdict::Untrained
        } else {
            ModelVerdict::Confident(score)
        }
    }
}

/// Optional learned scorer consulted before the lookup tables.
///
/// Implementations must not block; anything they cannot answer is `Untrained`.
pub trait DimensionModel: Send + Sync {
    fn predict(&self, dimension: Dimension, a: u8, b: u8) -> ModelVerdict;
}

/// Sky table keyed by the absolute token difference.
pub fn sky_score(a: u8, b: u8) -> f64 {
    match a.abs_diff(b) {
        5 => 0.9,
        4 | 6 => 0.3,
        0 => 0.7,
        1 | 9 => 0.65,
        _ => 0.6,
    }
}

/// Earth table keyed by the absolute token difference.
pub fn earth_score(a: u8, b: u8) -> f64 {
    match a.abs_diff(b) {
        1 | 11 => 0.85,
        6 => 0.2,
        4 | 8 => 0.95,
        3 | 9 => 0.4,
        0 => 0.75,
        _ => 0.6,
    }
}

pub(crate) fn table_score(dimension: Dimension, a: u8, b: u8) -> f64 {
    match dimension {
        Dimension::Sky => sky_score(a, b),
        Dimension::Earth => earth_score(a, b),
    }
}

/// Scores one dimension, preferring a confident model verdict over the table.
///
/// A `Confident` value is re-checked against the confidence band, so a model
/// cannot push NaN or an out-of-range score past the clamp.
pub(crate) fn score_dimension(
    model: Option<&dyn DimensionModel>,
    dimension: Dimension,
    a: u8,
    b: u8,
) -> f64 {
    let verdict = model.map(|model| match model.predict(dimension, a, b) {
        ModelVerdict::Confident(raw) => ModelVerdict::from_prediction(raw),
        ModelVerdict::Untrained => ModelVerdict::Untrained,
    });
    match verdict {
        Some(ModelVerdict::Confident(score)) => score,
        Some(ModelVerdict::Untrained) => {
            tracing::debug!(
                dimension = dimension.label(),
                "model verdict untrained; using lookup table"
            );
            table_score(dimension, a, b)
        }
        None => table_score(dimension, a, b),
    }
}
