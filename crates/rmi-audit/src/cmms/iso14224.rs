//! ISO 14224 hierarchy and failure-taxonomy checks over a parsed CMMS export.
//!
//! Every check yields a [`TaxonomyCheck`]; the combined list feeds
//! [`iso14224_compliance`](super::iso14224_compliance).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::TaxonomyCheck;

pub const FAILURE_MODE_CATEGORIES: [&str; 10] = [
    "Breakdown",
    "Degraded",
    "External leakage",
    "Internal leakage",
    "Erratic output",
    "Fail to start",
    "Fail to stop",
    "Spurious operation",
    "Structural deficiency",
    "Parameter deviation",
];

const MIN_HIERARCHY_LEVELS: usize = 4;
const NAMING_SAMPLE: usize = 20;
const NAMING_DELIMITERS: [char; 4] = ['-', '_', '.', '/'];
const NAMING_CONSISTENCY: f64 = 0.80;
const MODE_ALIGNMENT: f64 = 0.70;
const FIELD_COMPLETENESS: f64 = 0.90;
const MEANINGFUL_CLOSURE_CODES: f64 = 0.80;
const MIN_AVERAGE_NOTE_CHARS: f64 = 20.0;
const GENERIC_CLOSURE_CODES: [&str; 7] = ["done", "fixed", "complete", "ok", "closed", "n/a", ""];

const FUNCTIONAL_LOCATION: &str = "functional_location";
const FAILURE_MODE: &str = "failure_mode";
const FAILURE_CAUSE: &str = "failure_cause";
const COMPONENT: &str = "component";
const CLOSURE_CODE: &str = "closure_code";
const CLOSURE_NOTES: &str = "closure_notes";

/// Header and rows of an export as the import layer read them. Column names are
/// matched case-insensitively; blank cells count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<BTreeMap<String, String>>,
}

impl ExportTable {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|column| column.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, cells: &[(&str, &str)]) -> Self {
        self.rows.push(
            cells
                .iter()
                .map(|(column, value)| (column.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    fn normalized_columns(&self) -> impl Iterator<Item = String> + '_ {
        self.columns
            .iter()
            .map(|column| column.trim().to_ascii_lowercase())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.normalized_columns().any(|column| column == name)
    }

    /// Cell values of one column, row by row.
    fn cells<'a>(&'a self, name: &'a str) -> impl Iterator<Item = Option<&'a str>> + 'a {
        self.rows.iter().map(move |row| {
            row.iter()
                .find(|(column, _)| column.trim().eq_ignore_ascii_case(name))
                .map(|(_, value)| value.trim())
                .filter(|value| !value.is_empty())
        })
    }
}

fn check(
    category: &str,
    check_name: impl Into<String>,
    passed: bool,
    evidence: String,
) -> TaxonomyCheck {
    TaxonomyCheck {
        category: category.to_string(),
        check_name: check_name.into(),
        passed,
        evidence,
    }
}

/// Whether most sampled locations share one delimiter.
pub(crate) fn naming_is_consistent(locations: &[Option<&str>]) -> bool {
    let sample = &locations[..locations.len().min(NAMING_SAMPLE)];
    if sample.is_empty() {
        return false;
    }
    NAMING_DELIMITERS.iter().any(|delimiter| {
        let carrying = sample
            .iter()
            .filter(|location| location.is_some_and(|name| name.contains(*delimiter)))
            .count();
        carrying as f64 / sample.len() as f64 >= NAMING_CONSISTENCY
    })
}

/// Hierarchy depth, functional location naming and component-level tracking.
pub fn hierarchy_checks(table: &ExportTable) -> Vec<TaxonomyCheck> {
    let depth = table
        .normalized_columns()
        .filter(|column| column.contains("level") || column.contains("hierarchy"))
        .count();
    let mut checks = vec![check(
        "Hierarchy",
        "Hierarchy Depth",
        depth >= MIN_HIERARCHY_LEVELS,
        format!("{depth} hierarchy levels found, {MIN_HIERARCHY_LEVELS} expected"),
    )];

    if table.has_column(FUNCTIONAL_LOCATION) {
        let locations: Vec<Option<&str>> = table.cells(FUNCTIONAL_LOCATION).collect();
        let consistent = naming_is_consistent(&locations);
        checks.push(check(
            "Hierarchy",
            "Functional Location Naming Consistency",
            consistent,
            if consistent {
                "Functional locations share a naming convention".to_string()
            } else {
                "Functional location naming is inconsistent".to_string()
            },
        ));
    }

    let component_level = table.normalized_columns().any(|column| column.contains(COMPONENT));
    checks.push(check(
        "Hierarchy",
        "Component-Level Tracking",
        component_level,
        if component_level {
            "Components are tracked below equipment".to_string()
        } else {
            "No component level in the export".to_string()
        },
    ));

    checks
}

fn mode_is_standard(mode: &str) -> bool {
    let lowered = mode.to_lowercase();
    FAILURE_MODE_CATEGORIES
        .iter()
        .any(|category| lowered.contains(&category.to_lowercase()))
}

/// Failure mode and cause capture, alignment of recorded modes with the standard
/// categories, and the full component-mode-cause chain.
pub fn failure_taxonomy_checks(table: &ExportTable) -> Vec<TaxonomyCheck> {
    let has_mode = table.has_column(FAILURE_MODE);
    let has_cause = table.has_column(FAILURE_CAUSE);
    let has_component = table.has_column(COMPONENT);

    let mut checks = vec![check(
        "Failure Modes",
        "Failure Mode Field Exists",
        has_mode,
        format!("failure_mode column present: {has_mode}"),
    )];

    if has_mode {
        let modes: BTreeSet<&str> = table.cells(FAILURE_MODE).flatten().collect();
        let aligned = modes.iter().filter(|mode| mode_is_standard(mode)).count();
        let alignment = if modes.is_empty() {
            0.0
        } else {
            aligned as f64 / modes.len() as f64
        };
        checks.push(check(
            "Failure Modes",
            "Failure Mode Taxonomy Alignment",
            alignment >= MODE_ALIGNMENT,
            format!(
                "{aligned} of {} distinct failure modes match a standard category",
                modes.len()
            ),
        ));
    }

    checks.push(check(
        "Failure Causes",
        "Failure Cause Field Exists",
        has_cause,
        format!("failure_cause column present: {has_cause}"),
    ));

    let complete = has_component && has_mode && has_cause;
    checks.push(check(
        "Taxonomy",
        "Complete Failure Taxonomy (Component-Mode-Cause)",
        complete,
        if complete {
            "Component, failure mode and failure cause are all captured".to_string()
        } else {
            "The component-mode-cause chain is incomplete".to_string()
        },
    ));

    checks
}

/// One check per critical field: the column exists and at least 90% of rows fill it.
pub fn data_completeness_checks(
    table: &ExportTable,
    critical_fields: &[&str],
) -> Vec<TaxonomyCheck> {
    let total = table.rows.len();
    critical_fields
        .iter()
        .map(|field| {
            let name = format!("Critical Field: {field}");
            let normalized = field.trim().to_ascii_lowercase();
            if !table.has_column(&normalized) {
                return check(
                    "Data Completeness",
                    name,
                    false,
                    format!("{field} is missing from the export"),
                );
            }
            let populated = table.cells(&normalized).flatten().count();
            let completeness = if total == 0 {
                0.0
            } else {
                populated as f64 / total as f64
            };
            check(
                "Data Completeness",
                name,
                completeness >= FIELD_COMPLETENESS,
                format!("{populated} of {total} rows populated"),
            )
        })
        .collect()
}

/// Closure code specificity and closure note length. Missing codes count as generic
/// and missing notes as empty.
pub fn closure_quality_checks(table: &ExportTable) -> Vec<TaxonomyCheck> {
    let total = table.rows.len();
    let mut checks = Vec::new();

    if table.has_column(CLOSURE_CODE) {
        let meaningful = table
            .cells(CLOSURE_CODE)
            .flatten()
            .filter(|code| !GENERIC_CLOSURE_CODES.contains(&code.to_lowercase().as_str()))
            .count();
        let quality = if total == 0 {
            0.0
        } else {
            meaningful as f64 / total as f64
        };
        checks.push(check(
            "Data Quality",
            "Closure Code Quality",
            quality >= MEANINGFUL_CLOSURE_CODES,
            format!("{meaningful} of {total} closure codes are specific"),
        ));
    }

    if table.has_column(CLOSURE_NOTES) {
        let characters: usize = table
            .cells(CLOSURE_NOTES)
            .map(|note| note.map_or(0, |text| text.chars().count()))
            .sum();
        let average = if total == 0 {
            0.0
        } else {
            characters as f64 / total as f64
        };
        checks.push(check(
            "Data Quality",
            "Closure Notes Detail",
            average >= MIN_AVERAGE_NOTE_CHARS,
            format!("closure notes average {average:.1} characters"),
        ));
    }

    checks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmms::iso14224_compliance;

    fn passed(checks: &[TaxonomyCheck], name: &str) -> Option<bool> {
        checks
            .iter()
            .find(|check| check.check_name == name)
            .map(|check| check.passed)
    }

    #[test]
    fn deep_hierarchy_with_consistent_locations_passes() {
        let table = ExportTable::new(&[
            "Level_1_Site",
            "Level_2_Area",
            "Level_3_System",
            "Hierarchy_Equipment",
            "Component",
            "Functional_Location",
        ])
        .with_row(&[("Functional_Location", "PLT-A1-PMP-001")])
        .with_row(&[("Functional_Location", "PLT-A1-PMP-002")])
        .with_row(&[("Functional_Location", "PLT-A2-CMP-001")]);

        let checks = hierarchy_checks(&table);

        assert_eq!(checks.len(), 3);
        assert!(checks.iter().all(|check| check.passed), "{checks:?}");
        assert!(checks.iter().all(|check| check.category == "Hierarchy"));
    }

    #[test]
    fn shallow_hierarchy_without_components_fails() {
        let table = ExportTable::new(&["site", "level_1", "asset_id"]);

        let checks = hierarchy_checks(&table);

        assert_eq!(passed(&checks, "Hierarchy Depth"), Some(false));
        assert_eq!(passed(&checks, "Component-Level Tracking"), Some(false));
        assert_eq!(passed(&checks, "Functional Location Naming Consistency"), None);
    }

    #[test]
    fn naming_consistency_samples_the_first_twenty_locations() {
        let mut locations: Vec<Option<&str>> = vec![Some("P-100"); 16];
        locations.extend([Some("pump 7"), None, Some("P100"), Some("P101")]);
        assert!(naming_is_consistent(&locations));

        locations[0] = Some("P100");
        assert!(!naming_is_consistent(&locations));

        locations.extend(vec![Some("P-200"); 30]);
        assert!(!naming_is_consistent(&locations));
        assert!(!naming_is_consistent(&[]));
    }

    #[test]
    fn failure_modes_must_mostly_use_standard_categories() {
        let aligned = ExportTable::new(&["component", "failure_mode", "failure_cause"])
            .with_row(&[("failure_mode", "Breakdown")])
            .with_row(&[("failure_mode", "External leakage - seal")])
            .with_row(&[("failure_mode", "breakdown")])
            .with_row(&[("failure_mode", "FAIL TO START")]);

        let checks = failure_taxonomy_checks(&aligned);

        assert_eq!(checks.len(), 4);
        assert!(checks.iter().all(|check| check.passed), "{checks:?}");

        let free_text = ExportTable::new(&["failure_mode"])
            .with_row(&[("failure_mode", "Breakdown")])
            .with_row(&[("failure_mode", "broke")])
            .with_row(&[("failure_mode", "noisy")]);

        let checks = failure_taxonomy_checks(&free_text);

        assert_eq!(passed(&checks, "Failure Mode Taxonomy Alignment"), Some(false));
        assert_eq!(passed(&checks, "Failure Cause Field Exists"), Some(false));
        assert_eq!(
            passed(&checks, "Complete Failure Taxonomy (Component-Mode-Cause)"),
            Some(false)
        );
    }

    #[test]
    fn missing_failure_mode_skips_alignment() {
        let checks = failure_taxonomy_checks(&ExportTable::new(&["failure_cause"]));

        assert_eq!(passed(&checks, "Failure Mode Field Exists"), Some(false));
        assert_eq!(passed(&checks, "Failure Mode Taxonomy Alignment"), None);
        assert_eq!(passed(&checks, "Failure Cause Field Exists"), Some(true));
    }

    #[test]
    fn critical_fields_need_ninety_percent_population() {
        let mut table = ExportTable::new(&["asset_id", "failure_date"]);
        for idx in 0..10 {
            let date = if idx == 0 { "" } else { "2024-03-01" };
            table = table.with_row(&[("asset_id", "P-100"), ("failure_date", date)]);
        }

        let checks =
            data_completeness_checks(&table, &["asset_id", "failure_date", "downtime_hours"]);

        assert_eq!(passed(&checks, "Critical Field: asset_id"), Some(true));
        assert_eq!(passed(&checks, "Critical Field: failure_date"), Some(true));
        assert_eq!(passed(&checks, "Critical Field: downtime_hours"), Some(false));

        table.rows[1].insert("failure_date".to_string(), "  ".to_string());
        let checks = data_completeness_checks(&table, &["failure_date"]);
        assert_eq!(passed(&checks, "Critical Field: failure_date"), Some(false));
        assert!(checks.iter().all(|check| check.category == "Data Completeness"));
    }

    #[test]
    fn generic_closures_fail_quality_checks() {
        let table = ExportTable::new(&["closure_code", "closure_notes"])
            .with_row(&[("closure_code", "BRG-REPL"), ("closure_notes", "Replaced drive end bearing")])
            .with_row(&[("closure_code", "Done"), ("closure_notes", "done")])
            .with_row(&[("closure_code", "SEAL-REPL")])
            .with_row(&[("closure_code", "ALIGN"), ("closure_notes", "Realigned coupling")]);

        let checks = closure_quality_checks(&table);

        assert_eq!(passed(&checks, "Closure Code Quality"), Some(false));
        assert_eq!(passed(&checks, "Closure Notes Detail"), Some(false));

        let detailed = ExportTable::new(&["closure_code", "closure_notes"]).with_row(&[
            ("closure_code", "BRG-REPL"),
            ("closure_notes", "Replaced drive end bearing after vibration alarm"),
        ]);
        assert!(closure_quality_checks(&detailed).iter().all(|check| check.passed));
    }

    #[test]
    fn generated_checks_feed_the_compliance_score() {
        let table = ExportTable::new(&[
            "level_1",
            "level_2",
            "level_3",
            "level_4",
            "component",
            "failure_mode",
            "failure_cause",
            "asset_id",
        ])
        .with_row(&[
            ("failure_mode", "Degraded"),
            ("asset_id", "P-100"),
        ]);

        let mut checks = hierarchy_checks(&table);
        checks.extend(failure_taxonomy_checks(&table));
        checks.extend(data_completeness_checks(&table, &["asset_id", "failure_date"]));

        let metric = iso14224_compliance(&checks).expect("checks generated");

        assert_eq!(checks.len(), 8);
        assert_eq!(metric.percentage, 87.5);
        assert_eq!(metric.score, 4);
    }
}
