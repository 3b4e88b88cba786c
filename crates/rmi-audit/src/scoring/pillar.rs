use tracing::{debug, info, warn};

use super::config::ScoringConfig;
use super::domain::{
    CriticalFailure, EvidenceLockAdjustment, Pillar, PillarResult, QuestionDefinition,
    ScoringInput,
};
use super::grading::confidence_grade;
use super::validation::ScoringError;
use super::weights::normalize_role_weights;

/// Aggregates the eligible responses of a single pillar.
///
/// `inputs` must already be filtered and belong to `pillar`. Weights large enough to
/// overflow the weighted sums are rejected rather than turned into a NaN score.
pub(crate) fn aggregate_pillar(
    pillar: Pillar,
    inputs: &[&ScoringInput],
    config: &ScoringConfig,
) -> Result<PillarResult, ScoringError> {
    let role_weights =
        normalize_role_weights(inputs.iter().map(|input| input.question.target_role), config);

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut covered = 0usize;
    let mut response_count = 0usize;
    let mut critical_failures = Vec::new();
    let mut evidence_locks = Vec::new();

    for input in inputs {
        let question = &input.question;
        let response = &input.response;
        let Some(submitted) = response.score else {
            continue;
        };
        response_count += 1;

        let effective = effective_score(question, submitted, response.evidence_provided, config);
        if effective < submitted {
            info!(
                pillar = pillar.label(),
                "evidence lock applied to {}: effective score lowered to {} (original {})",
                question.code,
                effective,
                submitted
            );
            evidence_locks.push(EvidenceLockAdjustment {
                question_code: question.code.clone(),
                submitted_score: submitted,
                effective_score: effective,
            });
        }

        let combined_weight = role_weights.weight(question.target_role) * question.weight;
        weighted_sum += effective * combined_weight;
        total_weight += combined_weight;

        // Detection uses the submitted answer, not the evidence-locked value.
        if question.is_critical && submitted <= config.critical_failure_threshold {
            critical_failures.push(CriticalFailure {
                question_code: question.code.clone(),
                score: submitted,
            });
        }

        if response.evidence_provided || !question.evidence_required {
            covered += 1;
        }
    }

    if !weighted_sum.is_finite() || !total_weight.is_finite() {
        return Err(ScoringError::NonFiniteAggregate { pillar });
    }

    let raw_score = if total_weight > 0.0 {
        Some(weighted_sum / total_weight)
    } else {
        None
    };

    let final_score = raw_score.map(|raw| apply_weakest_link(pillar, raw, &critical_failures, config));

    let evidence_coverage = if response_count > 0 {
        covered as f64 / response_count as f64
    } else {
        0.0
    };
    let confidence = confidence_grade(evidence_coverage, response_count, &config.confidence);

    debug!(
        pillar = pillar.label(),
        response_count,
        raw_score = ?raw_score,
        final_score = ?final_score,
        evidence_coverage,
        confidence = confidence.label(),
        "pillar aggregated"
    );

    Ok(PillarResult {
        pillar,
        raw_score,
        final_score,
        confidence,
        evidence_coverage,
        critical_failures,
        evidence_locks,
        response_count,
    })
}

/// Score used in aggregation after the evidence lock; the submitted score is untouched.
pub(crate) fn effective_score(
    question: &QuestionDefinition,
    submitted: f64,
    evidence_provided: bool,
    config: &ScoringConfig,
) -> f64 {
    if question.evidence_required && submitted >= config.evidence_threshold && !evidence_provided
    {
        submitted.min(config.evidence_locked_score)
    } else {
        submitted
    }
}

fn apply_weakest_link(
    pillar: Pillar,
    raw: f64,
    failures: &[CriticalFailure],
    config: &ScoringConfig,
) -> f64 {
    let worst = failures
        .iter()
        .map(|failure| failure.score)
        .fold(None, |acc: Option<f64>, score| {
            Some(acc.map_or(score, |current| current.min(score)))
        });

    match worst.and_then(|worst| config.cap_for(worst).map(|cap| (worst, cap))) {
        Some((worst, cap)) if raw > cap => {
            warn!(
                pillar = pillar.label(),
                worst_critical = worst,
                raw_score = raw,
                cap,
                "critical failure caps pillar score"
            );
            cap
        }
        _ => raw,
    }
}
