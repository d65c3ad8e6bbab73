//! Period leaderboards built from completed, paired analyses.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    LeaderboardView, PeriodWindow, RankedEntry, RankingEntry, RankingPeriod, RankingRegistration,
    UnknownPeriod, MAX_INTRO_CHARS,
};
pub use repository::RankingRepository;
pub use router::{ranking_router, LeaderboardQuery};
pub use service::{RankingError, RankingService};
