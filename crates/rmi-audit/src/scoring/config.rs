use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::TargetRole;

pub const STANDARD_METHODOLOGY_VERSION: &str = "1.0";

/// Base weight given to a responding role with no entry in the nominal table.
pub const DEFAULT_FALLBACK_ROLE_WEIGHT: f64 = 0.5;

/// One tier of the weakest-link table: when the worst critical score is at or below
/// `worst_score`, the pillar's final score is capped at `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalCapTier {
    pub worst_score: f64,
    pub cap: f64,
}

/// Evidence coverage and volume dials backing the confidence grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceThresholds {
    pub high_min_coverage: f64,
    pub high_min_responses: usize,
    pub low_max_coverage: f64,
    pub low_max_responses: usize,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high_min_coverage: 0.80,
            high_min_responses: 5,
            low_max_coverage: 0.50,
            low_max_responses: 3,
        }
    }
}

/// Rule set for one scoring methodology version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub methodology_version: String,
    pub role_weights: BTreeMap<TargetRole, f64>,
    pub fallback_role_weight: f64,
    /// Scores at or above this need evidence to count at face value.
    pub evidence_threshold: f64,
    pub evidence_locked_score: f64,
    /// Critical questions scored at or below this are critical failures.
    pub critical_failure_threshold: f64,
    pub critical_caps: Vec<CriticalCapTier>,
    #[serde(default)]
    pub confidence: ConfidenceThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let mut role_weights = BTreeMap::new();
        role_weights.insert(TargetRole::Technician, 0.60);
        role_weights.insert(TargetRole::Manager, 0.20);
        role_weights.insert(TargetRole::Auditor, 0.20);

        Self {
            methodology_version: STANDARD_METHODOLOGY_VERSION.to_string(),
            role_weights,
            fallback_role_weight: DEFAULT_FALLBACK_ROLE_WEIGHT,
            evidence_threshold: 4.0,
            evidence_locked_score: 3.0,
            critical_failure_threshold: 2.0,
            critical_caps: vec![
                CriticalCapTier {
                    worst_score: 1.0,
                    cap: 2.0,
                },
                CriticalCapTier {
                    worst_score: 2.0,
                    cap: 3.0,
                },
            ],
            confidence: ConfidenceThresholds::default(),
        }
    }
}

impl ScoringConfig {
    pub fn from_json(raw: &str) -> Result<Self, ScoringConfigError> {
        let config: ScoringConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Nominal base weight for a role, falling back for roles missing from the table.
    pub fn nominal_weight(&self, role: TargetRole) -> f64 {
        self.role_weights
            .get(&role)
            .copied()
            .unwrap_or(self.fallback_role_weight)
    }

    /// Cap applied for the given worst critical score, if any tier matches.
    pub fn cap_for(&self, worst_score: f64) -> Option<f64> {
        self.critical_caps
            .iter()
            .find(|tier| worst_score <= tier.worst_score)
            .map(|tier| tier.cap)
    }

    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        if self.role_weights.is_empty() {
            return Err(ScoringConfigError::MissingRoleWeights);
        }
        for (role, weight) in &self.role_weights {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(ScoringConfigError::NonPositiveRoleWeight {
                    role: *role,
                    weight: *weight,
                });
            }
        }
        if !self.fallback_role_weight.is_finite() || self.fallback_role_weight <= 0.0 {
            return Err(ScoringConfigError::NonPositiveFallbackWeight(
                self.fallback_role_weight,
            ));
        }
        if !self.evidence_locked_score.is_finite()
            || !self.evidence_threshold.is_finite()
            || self.evidence_locked_score >= self.evidence_threshold
        {
            return Err(ScoringConfigError::EvidenceLock {
                threshold: self.evidence_threshold,
                locked_score: self.evidence_locked_score,
            });
        }

        let mut previous: Option<CriticalCapTier> = None;
        for tier in &self.critical_caps {
            if !tier.worst_score.is_finite() || !tier.cap.is_finite() || tier.cap <= 0.0 {
                return Err(ScoringConfigError::CapTier(format!(
                    "tier {}->{} must be finite and positive",
                    tier.worst_score, tier.cap
                )));
            }
            if tier.worst_score > self.critical_failure_threshold {
                return Err(ScoringConfigError::CapTier(format!(
                    "tier for score {} lies above the critical failure threshold {}",
                    tier.worst_score, self.critical_failure_threshold
                )));
            }
            if let Some(prev) = previous {
                if tier.worst_score <= prev.worst_score || tier.cap < prev.cap {
                    return Err(ScoringConfigError::CapTier(
                        "tiers must be ordered by ascending score and non-decreasing cap"
                            .to_string(),
                    ));
                }
            }
            previous = Some(*tier);
        }

        let confidence = &self.confidence;
        let coverage_in_unit_range =
            |value: f64| value.is_finite() && (0.0..=1.0).contains(&value);
        if !coverage_in_unit_range(confidence.high_min_coverage)
            || !coverage_in_unit_range(confidence.low_max_coverage)
            || confidence.low_max_coverage > confidence.high_min_coverage
            || confidence.low_max_responses > confidence.high_min_responses
        {
            return Err(ScoringConfigError::ConfidenceThresholds);
        }

        Ok(())
    }
}

/// Configuration errors raised when an engine is constructed.
#[derive(Debug, thiserror::Error)]
pub enum ScoringConfigError {
    #[error("nominal role weights are missing")]
    MissingRoleWeights,
    #[error("nominal weight for {role:?} must be positive (found {weight})")]
    NonPositiveRoleWeight { role: TargetRole, weight: f64 },
    #[error("fallback role weight must be positive (found {0})")]
    NonPositiveFallbackWeight(f64),
    #[error("evidence-locked score {locked_score} must sit below the evidence threshold {threshold}")]
    EvidenceLock { threshold: f64, locked_score: f64 },
    #[error("invalid critical cap table: {0}")]
    CapTier(String),
    #[error("confidence coverage thresholds must lie in 0..=1 with low not above high")]
    ConfidenceThresholds,
    #[error("unable to parse methodology: {0}")]
    Parse(#[from] serde_json::Error),
}
