use super::interpretation::CompatibilityTier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of penalty categories carried per person.
pub const TRAIT_SLOTS: usize = 8;

/// Gender flag used to pick penalty magnitudes. Encoded as `0` (female) / `1` (male) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const fn flag(self) -> u8 {
        match self {
            Gender::Female => 0,
            Gender::Male => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }
}

impl From<Gender> for u8 {
    fn from(value: Gender) -> Self {
        value.flag()
    }
}

impl TryFrom<u8> for Gender {
    type Error = UnknownGender;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Gender::Female),
            1 => Ok(Gender::Male),
            other => Err(UnknownGender(other.to_string())),
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "0" | "f" | "female" => Ok(Gender::Female),
            "1" | "m" | "male" => Ok(Gender::Male),
            _ => Err(UnknownGender(value.trim().to_string())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("gender must be 0/1 or female/male, found '{0}'")]
pub struct UnknownGender(pub String);

/// Birth date, hour and gender of one person.
///
/// Ranges are not enforced by the type; see [`BirthRecord::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthRecord {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub hour: i32,
    pub gender: Gender,
}

/// The six pillar tokens derived from a birth record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PillarToken {
    pub year_sky: u8,
    pub year_earth: u8,
    pub month_sky: u8,
    pub month_earth: u8,
    pub day_sky: u8,
    pub day_earth: u8,
}

impl PillarToken {
    pub const fn from_array(tokens: [u8; 6]) -> Self {
        Self {
            year_sky: tokens[0],
            year_earth: tokens[1],
            month_sky: tokens[2],
            month_earth: tokens[3],
            day_sky: tokens[4],
            day_earth: tokens[5],
        }
    }

    pub const fn as_array(&self) -> [u8; 6] {
        [
            self.year_sky,
            self.year_earth,
            self.month_sky,
            self.month_earth,
            self.day_sky,
            self.day_earth,
        ]
    }
}

/// Per-person breakdown of how much each penalty category removed from the score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitPenaltyVector(pub [f64; TRAIT_SLOTS]);

impl TraitPenaltyVector {
    pub fn slot(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or_default()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub(crate) fn add(&mut self, index: usize, amount: f64) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot += amount;
        }
    }
}

/// Complete outcome of one compatibility analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub compatibility_score: f64,
    pub pillars_person1: PillarToken,
    pub pillars_person2: PillarToken,
    pub sky_score: f64,
    pub earth_score: f64,
    pub trait_penalties_person1: TraitPenaltyVector,
    pub trait_penalties_person2: TraitPenaltyVector,
    pub tier: CompatibilityTier,
    pub interpretation: String,
}
