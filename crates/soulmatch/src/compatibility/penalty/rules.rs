use serde::{Deserialize, Serialize};

use super::super::domain::{Gender, PillarToken};
use super::config::PenaltyWeights;

/// Named slots of the trait penalty vector. Slots 2..8 are reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyCategory {
    Void,
    SixHarm,
}

impl PenaltyCategory {
    pub const fn slot(self) -> usize {
        match self {
            PenaltyCategory::Void => 0,
            PenaltyCategory::SixHarm => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PenaltyCategory::Void => "void",
            PenaltyCategory::SixHarm => "six_harm",
        }
    }
}

/// A deterministic penalty inspecting one person's own pillars.
pub trait PenaltyRule: Send + Sync {
    fn category(&self) -> PenaltyCategory;

    /// How many times the penalty applies to this person's pillars.
    fn firings(&self, pillars: &PillarToken) -> usize;

    fn magnitude(&self, gender: Gender, weights: &PenaltyWeights) -> f64;
}

/// Day branch paired with the year/month branches that form a void against it.
const VOID_TRIGGERS: [(u8, &[u8]); 3] = [(3, &[6, 9]), (7, &[2, 5, 7]), (2, &[7, 8, 11])];

/// Rule A: the year and month branches are checked independently, so both may fire.
#[derive(Debug, Default, Clone, Copy)]
pub struct VoidRule;

impl PenaltyRule for VoidRule {
    fn category(&self) -> PenaltyCategory {
        PenaltyCategory::Void
    }

    fn firings(&self, pillars: &PillarToken) -> usize {
        VOID_TRIGGERS
            .iter()
            .filter(|(day_branch, _)| *day_branch == pillars.day_earth)
            .map(|(_, partners)| {
                [pillars.year_earth, pillars.month_earth]
                    .iter()
                    .filter(|branch| partners.contains(*branch))
                    .count()
            })
            .sum()
    }

    fn magnitude(&self, gender: Gender, weights: &PenaltyWeights) -> f64 {
        weights.void.for_gender(gender)
    }
}

/// Rule B: fires at most once when either the year or month branch harms the day branch.
#[derive(Debug, Default, Clone, Copy)]
pub struct SixHarmRule;

impl SixHarmRule {
    pub const fn harm_partner(day_branch: u8) -> Option<u8> {
        match day_branch {
            1 => Some(10),
            2 => Some(7),
            3 => Some(8),
            4 => Some(9),
            5 => Some(12),
            6 => Some(11),
            7 => Some(2),
            8 => Some(3),
            9 => Some(4),
            10 => Some(1),
            11 => Some(6),
            12 => Some(5),
            _ => None,
        }
    }
}

impl PenaltyRule for SixHarmRule {
    fn category(&self) -> PenaltyCategory {
        PenaltyCategory::SixHarm
    }

    fn firings(&self, pillars: &PillarToken) -> usize {
        match Self::harm_partner(pillars.day_earth) {
            Some(partner) if pillars.year_earth == partner || pillars.month_earth == partner => 1,
            _ => 0,
        }
    }

    fn magnitude(&self, gender: Gender, weights: &PenaltyWeights) -> f64 {
        weights.six_harm.for_gender(gender)
    }
}
