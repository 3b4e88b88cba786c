use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{classify, percentage, Band, Comparison, MetricDetail, MetricError, MetricKind, MetricScore};

/// Days after the due date a PM may still be closed and count as on time.
pub const PM_GRACE_DAYS: i64 = 7;

const COMPLIANCE_BANDS: [Band; 4] = [
    Band {
        threshold: 0.95,
        score: 5,
        severity: "EXCELLENT",
    },
    Band {
        threshold: 0.85,
        score: 4,
        severity: "GOOD",
    },
    Band {
        threshold: 0.70,
        score: 3,
        severity: "ACCEPTABLE",
    },
    Band {
        threshold: 0.50,
        score: 2,
        severity: "POOR",
    },
];

/// Preventive maintenance task with its due and completion dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PmRecord {
    pub id: String,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed_date: Option<NaiveDate>,
}

impl PmRecord {
    /// Days between due and completion; `None` while still open.
    pub fn days_late(&self) -> Option<i64> {
        self.completed_date
            .map(|completed| (completed - self.due_date).num_days())
    }

    pub fn on_time(&self) -> bool {
        self.days_late().is_some_and(|days| days <= PM_GRACE_DAYS)
    }
}

/// On-time completion rate of the PM program. Open tasks count as late.
pub fn pm_compliance(records: &[PmRecord]) -> Result<MetricScore, MetricError> {
    if records.is_empty() {
        return Err(MetricError::NoRecords(MetricKind::PmCompliance.label()));
    }

    let total = records.len();
    let on_time = records.iter().filter(|record| record.on_time()).count();
    let ratio = on_time as f64 / total as f64;

    let late_days: Vec<i64> = records
        .iter()
        .filter_map(PmRecord::days_late)
        .filter(|days| *days > 0)
        .collect();
    let average_days_late = if late_days.is_empty() {
        None
    } else {
        let mean = late_days.iter().sum::<i64>() as f64 / late_days.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    let (score, severity) = classify(
        ratio,
        Comparison::AtLeast,
        &COMPLIANCE_BANDS,
        (1, "CRITICAL - PM program breaking down"),
    );

    Ok(MetricScore {
        metric: MetricKind::PmCompliance,
        score,
        severity: severity.to_string(),
        percentage: percentage(ratio),
        detail: MetricDetail::PmCompliance {
            total_pms: total,
            on_time_pms: on_time,
            late_pms: total - on_time,
            average_days_late,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date")
    }

    fn pm(id: usize, due: u32, completed: Option<u32>) -> PmRecord {
        PmRecord {
            id: format!("PM-{id}"),
            due_date: date(due),
            completed_date: completed.map(date),
        }
    }

    #[test]
    fn grace_period_counts_as_on_time() {
        assert!(pm(1, 1, Some(8)).on_time());
        assert!(!pm(2, 1, Some(9)).on_time());
        assert!(!pm(3, 1, None).on_time());
        assert!(pm(4, 10, Some(2)).on_time());
    }

    #[test]
    fn scores_compliance_rate() {
        let mut records: Vec<PmRecord> = (0..17).map(|id| pm(id, 1, Some(3))).collect();
        records.push(pm(17, 1, Some(20)));
        records.push(pm(18, 1, None));
        records.push(pm(19, 1, None));

        let metric = pm_compliance(&records).expect("records present");

        assert_eq!(metric.score, 4);
        assert_eq!(metric.percentage, 85.0);
        match metric.detail {
            MetricDetail::PmCompliance {
                on_time_pms,
                late_pms,
                average_days_late,
                ..
            } => {
                assert_eq!(on_time_pms, 17);
                assert_eq!(late_pms, 3);
                assert_eq!(average_days_late, Some(2.9));
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn collapsing_program_scores_one() {
        let records = vec![pm(1, 1, None), pm(2, 1, Some(28)), pm(3, 1, Some(1))];

        let metric = pm_compliance(&records).expect("records present");

        assert_eq!(metric.score, 1);
    }

    #[test]
    fn empty_program_is_an_error() {
        assert!(matches!(pm_compliance(&[]), Err(MetricError::NoRecords(_))));
    }
}
