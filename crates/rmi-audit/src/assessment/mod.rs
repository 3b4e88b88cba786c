//! Assessment-level facade over the scoring engine.
//!
//! The service reads one consistent snapshot of an assessment's responses from the
//! repository, scores it, and stores the result as the latest score record. Storage
//! is last-write-wins; a superseded run is simply overwritten by the newer one.

pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use repository::{
    AssessmentId, AssessmentRepository, AssessmentSnapshot, RepositoryError, ScoreRecord,
};
pub use router::assessment_router;
pub use service::{AssessmentScoringService, ScoringServiceError};
