use super::domain::{BirthRecord, PillarToken};

const STEM_CYCLE: i32 = 10;
const BRANCH_CYCLE: i32 = 12;
const STEM_EPOCH_YEAR: i32 = 1904;
const BRANCH_EPOCH_YEAR: i32 = 1990;

/// Derives the six pillar tokens for a birth record.
///
/// The arithmetic is a simplified placeholder, not a calendrical conversion, and is
/// reproduced as-is so scores stay stable. The hour is accepted but not read.
pub fn encode(birth: &BirthRecord) -> PillarToken {
    let BirthRecord {
        year, month, day, ..
    } = *birth;

    let year_sky = match (year - STEM_EPOCH_YEAR).rem_euclid(STEM_CYCLE) {
        0 => STEM_CYCLE,
        stem => stem,
    };
    let year_earth = ((year - BRANCH_EPOCH_YEAR).rem_euclid(BRANCH_CYCLE) + 2)
        .rem_euclid(BRANCH_CYCLE)
        + 1;
    let month_sky = ((year_sky - 1) * 2 + month - 1).rem_euclid(STEM_CYCLE) + 1;
    let month_earth = (month + 1).rem_euclid(BRANCH_CYCLE) + 1;

    let day_seed = year + month + day;
    let day_sky = day_seed.rem_euclid(STEM_CYCLE) + 1;
    let day_earth = day_seed.rem_euclid(BRANCH_CYCLE) + 1;

    PillarToken {
        year_sky: token(year_sky),
        year_earth: token(year_earth),
        month_sky: token(month_sky),
        month_earth: token(month_earth),
        day_sky: token(day_sky),
        day_earth: token(day_earth),
    }
}

// Every value above is already reduced into 1..=12.
fn token(value: i32) -> u8 {
    u8::try_from(value).unwrap_or_default()
}
