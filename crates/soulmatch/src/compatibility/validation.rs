use std::ops::RangeInclusive;

use super::domain::BirthRecord;

pub const BIRTH_YEAR_RANGE: RangeInclusive<i32> = 1900..=2025;
pub const BIRTH_MONTH_RANGE: RangeInclusive<i32> = 1..=12;
pub const BIRTH_DAY_RANGE: RangeInclusive<i32> = 1..=31;
pub const BIRTH_HOUR_RANGE: RangeInclusive<i32> = 0..=23;

/// Birth field outside the range accepted upstream of the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("birth year {0} outside 1900-2025")]
    Year(i32),
    #[error("birth month {0} outside 1-12")]
    Month(i32),
    #[error("birth day {0} outside 1-31")]
    Day(i32),
    #[error("birth hour {0} outside 0-23")]
    Hour(i32),
}

impl BirthRecord {
    /// Checks the record against the ranges the engine expects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !BIRTH_YEAR_RANGE.contains(&self.year) {
            return Err(ValidationError::Year(self.year));
        }
        if !BIRTH_MONTH_RANGE.contains(&self.month) {
            return Err(ValidationError::Month(self.month));
        }
        if !BIRTH_DAY_RANGE.contains(&self.day) {
            return Err(ValidationError::Day(self.day));
        }
        if !BIRTH_HOUR_RANGE.contains(&self.hour) {
            return Err(ValidationError::Hour(self.hour));
        }
        Ok(())
    }
}
