//! Field-observation checklists recorded while shadowing work execution.

use serde::{Deserialize, Serialize};

use crate::scoring::{
    Pillar, QuestionCode, QuestionDefinition, Response, ScoreScale, ScoringInput, TargetRole,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObservationSeverity {
    Critical,
    Major,
    Minor,
}

/// Checklist template row; recording a result turns it into a [`FieldObservation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub title: &'static str,
    pub kind: &'static str,
    pub pillar: Pillar,
    pub subcategory: &'static str,
    pub severity: ObservationSeverity,
}

impl ChecklistItem {
    pub fn record(&self, passed: Option<bool>) -> FieldObservation {
        FieldObservation {
            title: self.title.to_string(),
            kind: self.kind.to_string(),
            pillar: self.pillar,
            subcategory: self.subcategory.to_string(),
            severity: self.severity,
            passed,
        }
    }
}

pub const WORK_EXECUTION_CHECKLIST: [ChecklistItem; 3] = [
    ChecklistItem {
        title: "Spare Parts Availability",
        kind: "Work Execution",
        pillar: Pillar::Process,
        subcategory: "Planning & Kitting",
        severity: ObservationSeverity::Major,
    },
    ChecklistItem {
        title: "SOP Reference & Usage",
        kind: "Work Execution",
        pillar: Pillar::Process,
        subcategory: "SOP Compliance",
        severity: ObservationSeverity::Major,
    },
    ChecklistItem {
        title: "Tools & Equipment Ready",
        kind: "Work Execution",
        pillar: Pillar::Process,
        subcategory: "Job Preparation",
        severity: ObservationSeverity::Minor,
    },
];

pub const SAFETY_CHECKLIST: [ChecklistItem; 3] = [
    ChecklistItem {
        title: "LOTO Procedure Applied",
        kind: "Safety Compliance",
        pillar: Pillar::Process,
        subcategory: "Safety",
        severity: ObservationSeverity::Critical,
    },
    ChecklistItem {
        title: "PPE Compliance",
        kind: "Safety Compliance",
        pillar: Pillar::People,
        subcategory: "Safety Culture",
        severity: ObservationSeverity::Critical,
    },
    ChecklistItem {
        title: "Permit-to-Work Obtained",
        kind: "Safety Compliance",
        pillar: Pillar::Process,
        subcategory: "Safety",
        severity: ObservationSeverity::Critical,
    },
];

pub const CMMS_USAGE_CHECKLIST: [ChecklistItem; 3] = [
    ChecklistItem {
        title: "Technician Accesses Work Order on Mobile",
        kind: "CMMS Usage",
        pillar: Pillar::Technology,
        subcategory: "System Adoption",
        severity: ObservationSeverity::Minor,
    },
    ChecklistItem {
        title: "Work Order Updates in Real-Time",
        kind: "CMMS Usage",
        pillar: Pillar::Technology,
        subcategory: "Data Timeliness",
        severity: ObservationSeverity::Minor,
    },
    ChecklistItem {
        title: "Photo Attached to Work Order",
        kind: "CMMS Usage",
        pillar: Pillar::Technology,
        subcategory: "Documentation Quality",
        severity: ObservationSeverity::Minor,
    },
];

/// Pass/fail observation of one checklist item in the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldObservation {
    pub title: String,
    pub kind: String,
    pub pillar: Pillar,
    #[serde(default)]
    pub subcategory: String,
    pub severity: ObservationSeverity,
    /// `None` until the auditor records an outcome.
    #[serde(default)]
    pub passed: Option<bool>,
}

impl FieldObservation {
    pub fn is_critical_failure(&self) -> bool {
        self.severity == ObservationSeverity::Critical && self.passed == Some(false)
    }

    /// Pass maps to 5, fail to 1; an unrecorded outcome is not applicable.
    pub fn to_response(&self, question_code: QuestionCode) -> Response {
        match self.passed {
            Some(passed) => {
                let score = if passed {
                    ScoreScale::BINARY_PASS
                } else {
                    ScoreScale::BINARY_FAIL
                };
                Response::scored(question_code, score, true)
            }
            None => Response::not_applicable(question_code),
        }
    }

    /// Auditor question for this observation. Critical-severity items take part in the
    /// weakest-link cap like any critical question.
    pub fn to_question(&self, question_code: QuestionCode, weight: f64) -> QuestionDefinition {
        QuestionDefinition {
            code: question_code,
            text: self.title.clone(),
            pillar: self.pillar,
            subcategory: self.subcategory.clone(),
            target_role: TargetRole::Auditor,
            weight,
            evidence_required: false,
            evidence_description: None,
            is_critical: self.severity == ObservationSeverity::Critical,
            scale: ScoreScale::Binary,
        }
    }

    pub fn to_scoring_input(&self, question_code: QuestionCode, weight: f64) -> ScoringInput {
        let response = self.to_response(question_code.clone());
        ScoringInput::new(self.to_question(question_code, weight), response)
    }
}

/// Failed observations of critical severity.
pub fn critical_observation_failures(observations: &[FieldObservation]) -> Vec<&FieldObservation> {
    observations
        .iter()
        .filter(|observation| observation.is_critical_failure())
        .collect()
}
