use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{AssessmentScoreResult, ScoringInput};

/// Identifier wrapper for audit engagements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Consistent read of everything needed to score one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSnapshot {
    pub assessment_id: AssessmentId,
    pub inputs: Vec<ScoringInput>,
}

/// Scoring run as handed back to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub assessment_id: AssessmentId,
    pub calculated_at: DateTime<Utc>,
    pub result: AssessmentScoreResult,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    /// One transactional read of the assessment's questions and responses.
    fn snapshot(&self, id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, RepositoryError>;
    /// Replaces any previously stored score for the assessment.
    fn store_score(&self, record: ScoreRecord) -> Result<(), RepositoryError>;
    fn latest_score(&self, id: &AssessmentId) -> Result<Option<ScoreRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("assessment not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
