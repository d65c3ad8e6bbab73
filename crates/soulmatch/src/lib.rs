//! Soulmatch: deterministic birth-pillar compatibility scoring with stored analyses,
//! couple history and period leaderboards.

pub mod compatibility;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;

pub use compatibility::{analyze, AnalysisResult, BirthRecord, CompatibilityEngine, Gender};
pub use error::AppError;
