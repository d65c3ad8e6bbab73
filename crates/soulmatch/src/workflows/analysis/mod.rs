//! Analysis request lifecycle around the compatibility engine.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisHistoryEntry, AnalysisStatus, AnalysisSubmission, AnalysisView, CoupleId,
    DetailedScores, Partner, RequestId,
};
pub use repository::{AnalysisRecord, AnalysisRepository};
pub use router::{analysis_router, PreviewRequest};
pub use service::{AnalysisService, AnalysisServiceError};
