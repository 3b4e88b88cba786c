use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::repository::{
    AssessmentId, AssessmentRepository, AssessmentSnapshot, RepositoryError, ScoreRecord,
};
use crate::scoring::{
    subcategory_breakdown, EvidenceGap, Pillar, ScoringEngine, ScoringError, SubcategoryBreakdown,
};

/// Service composing the repository and a scoring engine bound to one methodology.
pub struct AssessmentScoringService<R> {
    repository: Arc<R>,
    engine: Arc<ScoringEngine>,
}

impl<R> AssessmentScoringService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: ScoringEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Score the assessment from a fresh snapshot and store the result.
    pub fn recompute(&self, id: &AssessmentId) -> Result<ScoreRecord, ScoringServiceError> {
        let snapshot = self.snapshot(id)?;
        let result = self.engine.score(&snapshot.inputs)?;

        let record = ScoreRecord {
            assessment_id: snapshot.assessment_id,
            calculated_at: Utc::now(),
            result,
        };
        self.repository.store_score(record.clone())?;

        info!(
            assessment = %record.assessment_id,
            methodology = %record.result.methodology_version,
            overall_rmi = ?record.result.overall_rmi,
            maturity = record.result.maturity_label(),
            "assessment scored"
        );

        Ok(record)
    }

    /// Most recently stored score. A known assessment without one is `NotScored`.
    pub fn latest(&self, id: &AssessmentId) -> Result<ScoreRecord, ScoringServiceError> {
        if let Some(record) = self.repository.latest_score(id)? {
            return Ok(record);
        }
        self.snapshot(id)?;
        Err(ScoringServiceError::NotScored(id.clone()))
    }

    pub fn evidence_gaps(&self, id: &AssessmentId) -> Result<Vec<EvidenceGap>, ScoringServiceError> {
        let snapshot = self.snapshot(id)?;
        Ok(self.engine.evidence_gaps(&snapshot.inputs))
    }

    pub fn breakdown(
        &self,
        id: &AssessmentId,
    ) -> Result<BTreeMap<Pillar, Vec<SubcategoryBreakdown>>, ScoringServiceError> {
        let snapshot = self.snapshot(id)?;
        Ok(subcategory_breakdown(&snapshot.inputs))
    }

    fn snapshot(&self, id: &AssessmentId) -> Result<AssessmentSnapshot, ScoringServiceError> {
        let snapshot = self
            .repository
            .snapshot(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(snapshot)
    }
}

/// Error raised by the assessment scoring service.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("assessment {0} has not been scored yet")]
    NotScored(AssessmentId),
}
