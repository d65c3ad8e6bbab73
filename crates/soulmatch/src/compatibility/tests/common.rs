use crate::compatibility::domain::{BirthRecord, Gender, PillarToken};
use crate::compatibility::scoring::{Dimension, DimensionModel, ModelVerdict};

pub(super) fn birth(year: i32, month: i32, day: i32, hour: i32, gender: Gender) -> BirthRecord {
    BirthRecord {
        year,
        month,
        day,
        hour,
        gender,
    }
}

/// 1995-05-15 14h, male. Pillars [1, 8, 5, 7, 6, 12]; no penalty fires.
pub(super) fn reference_groom() -> BirthRecord {
    birth(1995, 5, 15, 14, Gender::Male)
}

/// 1997-08-20 09h, female. Pillars [3, 10, 2, 10, 6, 10]; no penalty fires.
pub(super) fn reference_bride() -> BirthRecord {
    birth(1997, 8, 20, 9, Gender::Female)
}

/// Pillars whose penalty rules never fire.
pub(super) fn neutral_pillars() -> PillarToken {
    PillarToken::from_array([1, 8, 5, 7, 6, 12])
}

pub(super) fn sample_births() -> Vec<BirthRecord> {
    let mut births = Vec::new();
    for year in (1900..=2025).step_by(7) {
        for month in [1, 4, 6, 7, 9, 12] {
            for day in [1, 8, 15, 23, 31] {
                let gender = if (year + month + day) % 2 == 0 {
                    Gender::Male
                } else {
                    Gender::Female
                };
                births.push(birth(year, month, day, day % 24, gender));
            }
        }
    }
    births
}

pub(super) struct FixedModel(pub(super) ModelVerdict);

impl DimensionModel for FixedModel {
    fn predict(&self, _dimension: Dimension, _a: u8, _b: u8) -> ModelVerdict {
        self.0
    }
}
