//! Scores derived from maintenance-system (CMMS) exports.
//!
//! Each scorer works on records the import layer has already parsed and mapped, and
//! produces a [`MetricScore`] on the 1-5 scale that is fed to the engine as an ordinary
//! response for the matching audit question.

mod iso14224;
mod preventive;
mod taxonomy;
mod work_orders;

pub use iso14224::{
    closure_quality_checks, data_completeness_checks, failure_taxonomy_checks, hierarchy_checks,
    ExportTable, FAILURE_MODE_CATEGORIES,
};
pub use preventive::{pm_compliance, PmRecord, PM_GRACE_DAYS};
pub use taxonomy::{iso14224_compliance, CategoryTally, TaxonomyCheck};
pub use work_orders::{bad_actors, data_graveyard_index, reactive_ratio, BadActor, WorkOrder};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::{QuestionCode, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ReactiveRatio,
    PmCompliance,
    DataGraveyardIndex,
    Iso14224Compliance,
}

impl MetricKind {
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::ReactiveRatio => "Reactive Ratio",
            MetricKind::PmCompliance => "PM Compliance",
            MetricKind::DataGraveyardIndex => "Data Graveyard Index",
            MetricKind::Iso14224Compliance => "ISO 14224 Compliance",
        }
    }
}

/// Counts behind a metric score, kept for the audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricDetail {
    ReactiveRatio {
        total_work_orders: usize,
        reactive_work_orders: usize,
        preventive_work_orders: usize,
        /// Reactive work exceeds half of all work orders.
        reactive_majority: bool,
    },
    PmCompliance {
        total_pms: usize,
        on_time_pms: usize,
        late_pms: usize,
        average_days_late: Option<f64>,
    },
    DataGraveyard {
        total_work_orders: usize,
        poor_quality_closures: usize,
    },
    Iso14224 {
        total_checks: usize,
        passed_checks: usize,
        failed_checks: usize,
        by_category: BTreeMap<String, CategoryTally>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricScore {
    pub metric: MetricKind,
    pub score: u8,
    pub severity: String,
    /// The measured ratio as a percentage, one decimal.
    pub percentage: f64,
    pub detail: MetricDetail,
}

impl MetricScore {
    /// Response for the question this metric answers. The export itself is the evidence.
    pub fn to_response(&self, question_code: QuestionCode) -> Response {
        Response::scored(question_code, f64::from(self.score), true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    #[error("no records supplied for {0}")]
    NoRecords(&'static str),
    #[error("work orders carry neither a work order type nor a priority")]
    MissingClassification,
    #[error("work orders carry no asset identifier")]
    MissingAssetId,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Comparison {
    Above,
    AtLeast,
}

/// Threshold row; bands are checked in order and the first match wins.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Band {
    pub threshold: f64,
    pub score: u8,
    pub severity: &'static str,
}

pub(crate) fn classify(
    value: f64,
    comparison: Comparison,
    bands: &[Band],
    floor: (u8, &'static str),
) -> (u8, &'static str) {
    bands
        .iter()
        .find(|band| match comparison {
            Comparison::Above => value > band.threshold,
            Comparison::AtLeast => value >= band.threshold,
        })
        .map(|band| (band.score, band.severity))
        .unwrap_or(floor)
}

pub(crate) fn percentage(ratio: f64) -> f64 {
    (ratio * 1000.0).round() / 10.0
}
