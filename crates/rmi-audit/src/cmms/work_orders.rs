use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{classify, percentage, Band, Comparison, MetricDetail, MetricError, MetricKind, MetricScore};

const REACTIVE_TYPES: [&str; 4] = ["emergency", "corrective", "breakdown", "urgent"];
const REACTIVE_PRIORITIES: [&str; 3] = ["1", "emergency", "urgent"];
const GENERIC_CLOSURES: [&str; 7] = ["done", "fixed", "complete", "ok", "n/a", "closed", ""];
const MIN_CLOSURE_CHARS: usize = 10;
const FAILURE_TYPES: [&str; 3] = ["corrective", "emergency", "breakdown"];

const REACTIVE_BANDS: [Band; 4] = [
    Band {
        threshold: 0.60,
        score: 1,
        severity: "CRITICAL - Reactive spiral",
    },
    Band {
        threshold: 0.40,
        score: 2,
        severity: "HIGH - Reactive dominant",
    },
    Band {
        threshold: 0.25,
        score: 3,
        severity: "MEDIUM - Balanced but reactive-heavy",
    },
    Band {
        threshold: 0.15,
        score: 4,
        severity: "GOOD - Preventive focus",
    },
];

const GRAVEYARD_BANDS: [Band; 4] = [
    Band {
        threshold: 0.40,
        score: 1,
        severity: "SEVERE - Data graveyard, root cause analysis impossible",
    },
    Band {
        threshold: 0.20,
        score: 2,
        severity: "POOR - Significant data quality issues",
    },
    Band {
        threshold: 0.10,
        score: 3,
        severity: "ACCEPTABLE - Some improvement needed",
    },
    Band {
        threshold: 0.04,
        score: 4,
        severity: "GOOD - Minor gaps",
    },
];

/// Work order row as mapped from a CMMS export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub work_order_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub closure_notes: Option<String>,
}

fn matches_any(value: Option<&str>, candidates: &[&str]) -> bool {
    value
        .map(|raw| raw.trim().to_ascii_lowercase())
        .is_some_and(|normalized| candidates.contains(&normalized.as_str()))
}

/// Share of reactive work. Classified by work order type when the export carries one,
/// otherwise by priority.
pub fn reactive_ratio(orders: &[WorkOrder]) -> Result<MetricScore, MetricError> {
    if orders.is_empty() {
        return Err(MetricError::NoRecords(MetricKind::ReactiveRatio.label()));
    }

    let by_type = orders.iter().any(|order| order.work_order_type.is_some());
    let by_priority = orders.iter().any(|order| order.priority.is_some());

    let reactive = if by_type {
        orders
            .iter()
            .filter(|order| matches_any(order.work_order_type.as_deref(), &REACTIVE_TYPES))
            .count()
    } else if by_priority {
        orders
            .iter()
            .filter(|order| matches_any(order.priority.as_deref(), &REACTIVE_PRIORITIES))
            .count()
    } else {
        return Err(MetricError::MissingClassification);
    };

    let total = orders.len();
    let ratio = reactive as f64 / total as f64;
    let (score, severity) = classify(
        ratio,
        Comparison::Above,
        &REACTIVE_BANDS,
        (5, "EXCELLENT - Proactive maintenance"),
    );

    Ok(MetricScore {
        metric: MetricKind::ReactiveRatio,
        score,
        severity: severity.to_string(),
        percentage: percentage(ratio),
        detail: MetricDetail::ReactiveRatio {
            total_work_orders: total,
            reactive_work_orders: reactive,
            preventive_work_orders: total - reactive,
            reactive_majority: ratio > 0.5,
        },
    })
}

fn is_poor_closure(notes: Option<&str>) -> bool {
    match notes.map(str::trim) {
        None => true,
        Some(note) => {
            let lowered = note.to_ascii_lowercase();
            GENERIC_CLOSURES.contains(&lowered.as_str())
                || note.chars().count() < MIN_CLOSURE_CHARS
        }
    }
}

/// Share of work orders closed without usable failure information.
pub fn data_graveyard_index(orders: &[WorkOrder]) -> Result<MetricScore, MetricError> {
    if orders.is_empty() {
        return Err(MetricError::NoRecords(MetricKind::DataGraveyardIndex.label()));
    }

    let poor = orders
        .iter()
        .filter(|order| is_poor_closure(order.closure_notes.as_deref()))
        .count();
    let total = orders.len();
    let ratio = poor as f64 / total as f64;
    let (score, severity) = classify(
        ratio,
        Comparison::Above,
        &GRAVEYARD_BANDS,
        (5, "EXCELLENT - High data quality"),
    );

    Ok(MetricScore {
        metric: MetricKind::DataGraveyardIndex,
        score,
        severity: severity.to_string(),
        percentage: percentage(ratio),
        detail: MetricDetail::DataGraveyard {
            total_work_orders: total,
            poor_quality_closures: poor,
        },
    })
}

/// Asset ranked by the number of failure work orders raised against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadActor {
    pub asset_id: String,
    pub failure_count: usize,
}

/// The `top_n` assets with the most corrective, emergency or breakdown work orders.
/// An export without work order types counts every order as a failure. Ties rank by
/// asset id.
pub fn bad_actors(orders: &[WorkOrder], top_n: usize) -> Result<Vec<BadActor>, MetricError> {
    if orders.is_empty() {
        return Err(MetricError::NoRecords("Bad Actors"));
    }
    if orders.iter().all(|order| order.asset_id.is_none()) {
        return Err(MetricError::MissingAssetId);
    }

    let by_type = orders.iter().any(|order| order.work_order_type.is_some());
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for order in orders {
        let Some(asset) = order.asset_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
            continue;
        };
        if by_type && !matches_any(order.work_order_type.as_deref(), &FAILURE_TYPES) {
            continue;
        }
        *counts.entry(asset).or_default() += 1;
    }

    let mut ranked: Vec<BadActor> = counts
        .into_iter()
        .map(|(asset_id, failure_count)| BadActor {
            asset_id: asset_id.to_string(),
            failure_count,
        })
        .collect();
    ranked.sort_by(|a, b| b.failure_count.cmp(&a.failure_count));
    ranked.truncate(top_n);

    tracing::debug!(ranked = ranked.len(), "bad actors ranked");
    Ok(ranked)
}
