//! Reliability Maturity Index scoring.
//!
//! Responses flow one way: filter out drafts and N/A rows, validate what is left,
//! normalize role weights per pillar, aggregate each pillar (evidence lock, weighted
//! mean, weakest-link cap, confidence) and finally compose the overall index. Every
//! step is a pure function of its inputs, so one engine can score many assessments
//! concurrently.

mod config;
pub mod domain;
mod filter;
mod grading;
mod index;
mod pillar;
mod review;
mod validation;
mod weights;

#[cfg(test)]
mod tests;

pub use config::{
    ConfidenceThresholds, CriticalCapTier, ScoringConfig, ScoringConfigError,
    DEFAULT_FALLBACK_ROLE_WEIGHT, STANDARD_METHODOLOGY_VERSION,
};
pub use domain::{
    AssessmentScoreResult, ConfidenceGrade, CriticalFailure, EvidenceLockAdjustment,
    MaturityLevel, Pillar, PillarResult, QuestionCode, QuestionDefinition, Response,
    ScoreScale, ScoringInput, TargetRole,
};
pub use filter::eligible_inputs;
pub use grading::{confidence_grade, maturity_for, overall_confidence};
pub use index::compose_index;
pub use review::{
    evidence_gaps, subcategory_breakdown, EvidenceGap, QuestionSummary, SubcategoryBreakdown,
};
pub use validation::ScoringError;
pub use weights::{normalize_role_weights, EffectiveRoleWeights};

use tracing::debug;

/// Stateless scorer bound to one validated methodology.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ScoringConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Engine for the standard methodology.
    pub fn standard() -> Self {
        Self {
            config: ScoringConfig::default(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn methodology_version(&self) -> &str {
        &self.config.methodology_version
    }

    /// Score one assessment snapshot.
    pub fn score(&self, inputs: &[ScoringInput]) -> Result<AssessmentScoreResult, ScoringError> {
        let eligible = eligible_inputs(inputs);
        validation::validate_eligible(&eligible)?;

        debug!(
            total = inputs.len(),
            eligible = eligible.len(),
            methodology = %self.config.methodology_version,
            "scoring assessment"
        );

        let people = self.aggregate(Pillar::People, &eligible)?;
        let process = self.aggregate(Pillar::Process, &eligible)?;
        let technology = self.aggregate(Pillar::Technology, &eligible)?;

        let pillars = [&people, &process, &technology];
        let composed = compose_index(&pillars);
        let overall_confidence = overall_confidence(pillars.iter().map(|p| p.confidence));

        Ok(AssessmentScoreResult {
            methodology_version: self.config.methodology_version.clone(),
            overall_rmi: composed.map(|(index, _)| index),
            maturity: composed.map(|(_, level)| level),
            overall_confidence,
            people,
            process,
            technology,
        })
    }

    /// Score a single pillar from a full snapshot.
    pub fn score_pillar(
        &self,
        pillar: Pillar,
        inputs: &[ScoringInput],
    ) -> Result<PillarResult, ScoringError> {
        let eligible = eligible_inputs(inputs);
        validation::validate_eligible(&eligible)?;
        self.aggregate(pillar, &eligible)
    }

    pub fn evidence_gaps(&self, inputs: &[ScoringInput]) -> Vec<EvidenceGap> {
        evidence_gaps(inputs, &self.config)
    }

    fn aggregate(
        &self,
        pillar: Pillar,
        eligible: &[&ScoringInput],
    ) -> Result<PillarResult, ScoringError> {
        let in_pillar: Vec<&ScoringInput> = eligible
            .iter()
            .copied()
            .filter(|input| input.question.pillar == pillar)
            .collect();
        pillar::aggregate_pillar(pillar, &in_pillar, &self.config)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}
