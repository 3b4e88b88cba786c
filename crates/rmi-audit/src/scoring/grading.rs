use super::config::ConfidenceThresholds;
use super::domain::{ConfidenceGrade, MaturityLevel};

/// Upper bounds (exclusive) for each maturity band, in ascending order.
const MATURITY_BANDS: [(f64, MaturityLevel); 4] = [
    (2.0, MaturityLevel::Reactive),
    (3.0, MaturityLevel::EmergingPreventive),
    (4.0, MaturityLevel::Preventive),
    (4.5, MaturityLevel::Predictive),
];

/// Band for an overall index; a non-finite index has no band.
pub fn maturity_for(index: f64) -> Option<MaturityLevel> {
    if !index.is_finite() {
        return None;
    }
    let level = MATURITY_BANDS
        .iter()
        .find(|(upper, _)| index < *upper)
        .map(|(_, level)| *level)
        .unwrap_or(MaturityLevel::Prescriptive);
    Some(level)
}

pub fn confidence_grade(
    evidence_coverage: f64,
    response_count: usize,
    thresholds: &ConfidenceThresholds,
) -> ConfidenceGrade {
    if evidence_coverage >= thresholds.high_min_coverage
        && response_count >= thresholds.high_min_responses
    {
        ConfidenceGrade::High
    } else if evidence_coverage < thresholds.low_max_coverage
        || response_count < thresholds.low_max_responses
    {
        ConfidenceGrade::Low
    } else {
        ConfidenceGrade::Medium
    }
}

/// High only when every pillar is High; Low as soon as one pillar is Low.
pub fn overall_confidence<I>(grades: I) -> ConfidenceGrade
where
    I: IntoIterator<Item = ConfidenceGrade>,
{
    let mut all_high = true;
    let mut any = false;
    for grade in grades {
        any = true;
        match grade {
            ConfidenceGrade::Low => return ConfidenceGrade::Low,
            ConfidenceGrade::Medium => all_high = false,
            ConfidenceGrade::High => {}
        }
    }

    if any && all_high {
        ConfidenceGrade::High
    } else if any {
        ConfidenceGrade::Medium
    } else {
        ConfidenceGrade::Low
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
