use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{classify, percentage, Band, Comparison, MetricDetail, MetricError, MetricKind, MetricScore};

const PASS_RATE_BANDS: [Band; 4] = [
    Band {
        threshold: 0.90,
        score: 5,
        severity: "Fully aligned with ISO 14224",
    },
    Band {
        threshold: 0.75,
        score: 4,
        severity: "Largely aligned",
    },
    Band {
        threshold: 0.60,
        score: 3,
        severity: "Partially aligned",
    },
    Band {
        threshold: 0.40,
        score: 2,
        severity: "Weak hierarchy and taxonomy",
    },
];

/// Outcome of one asset-hierarchy or failure-taxonomy check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyCheck {
    pub category: String,
    pub check_name: String,
    pub passed: bool,
    /// What the check found, for the audit report.
    #[serde(default)]
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Pass rate of the ISO 14224 hierarchy and taxonomy checks mapped to the 1-5 scale.
pub fn iso14224_compliance(checks: &[TaxonomyCheck]) -> Result<MetricScore, MetricError> {
    if checks.is_empty() {
        return Err(MetricError::NoRecords(MetricKind::Iso14224Compliance.label()));
    }

    let mut by_category: BTreeMap<String, CategoryTally> = BTreeMap::new();
    for check in checks {
        let tally = by_category.entry(check.category.clone()).or_default();
        tally.total += 1;
        if check.passed {
            tally.passed += 1;
        } else {
            tally.failed += 1;
        }
    }

    let total = checks.len();
    let passed = checks.iter().filter(|check| check.passed).count();
    let ratio = passed as f64 / total as f64;
    let (score, severity) = classify(
        ratio,
        Comparison::AtLeast,
        &PASS_RATE_BANDS,
        (1, "Not aligned with ISO 14224"),
    );

    Ok(MetricScore {
        metric: MetricKind::Iso14224Compliance,
        score,
        severity: severity.to_string(),
        percentage: percentage(ratio),
        detail: MetricDetail::Iso14224 {
            total_checks: total,
            passed_checks: passed,
            failed_checks: total - passed,
            by_category,
        },
    })
}
