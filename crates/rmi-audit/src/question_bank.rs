//! Standard audit question bank.

use crate::scoring::{Pillar, QuestionCode, QuestionDefinition, ScoreScale, TargetRole};

struct QuestionTemplate {
    code: &'static str,
    text: &'static str,
    pillar: Pillar,
    subcategory: &'static str,
    target_role: TargetRole,
    weight: f64,
    evidence: Option<&'static str>,
    is_critical: bool,
    binary: bool,
}

impl QuestionTemplate {
    fn definition(&self) -> QuestionDefinition {
        QuestionDefinition {
            code: QuestionCode::new(self.code),
            text: self.text.to_string(),
            pillar: self.pillar,
            subcategory: self.subcategory.to_string(),
            target_role: self.target_role,
            weight: self.weight,
            evidence_required: self.evidence.is_some(),
            evidence_description: self.evidence.map(str::to_string),
            is_critical: self.is_critical,
            scale: if self.binary {
                ScoreScale::Binary
            } else {
                ScoreScale::likert()
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<QuestionDefinition>,
}

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: STANDARD_QUESTIONS
                .iter()
                .map(QuestionTemplate::definition)
                .collect(),
        }
    }

    pub fn questions(&self) -> &[QuestionDefinition] {
        &self.questions
    }

    pub fn get(&self, code: &str) -> Option<&QuestionDefinition> {
        self.questions
            .iter()
            .find(|question| question.code.as_str() == code)
    }

    pub fn for_pillar(&self, pillar: Pillar) -> Vec<&QuestionDefinition> {
        self.questions
            .iter()
            .filter(|question| question.pillar == pillar)
            .collect()
    }

    pub fn for_role(&self, role: TargetRole) -> Vec<&QuestionDefinition> {
        self.questions
            .iter()
            .filter(|question| question.target_role == role)
            .collect()
    }

    /// Questions whose failure caps their pillar.
    pub fn critical(&self) -> Vec<&QuestionDefinition> {
        self.questions
            .iter()
            .filter(|question| question.is_critical)
            .collect()
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

const STANDARD_QUESTIONS: [QuestionTemplate; 16] = [
    QuestionTemplate {
        code: "P-01",
        text: "Do you feel trained on the specific equipment you are assigned to maintain today?",
        pillar: Pillar::People,
        subcategory: "Competency",
        target_role: TargetRole::Technician,
        weight: 1.5,
        evidence: Some("Training certificate, competency matrix, or formal documentation"),
        is_critical: true,
        binary: false,
    },
    QuestionTemplate {
        code: "P-02",
        text: "In a typical week, how many times is your scheduled work interrupted by an emergency?",
        pillar: Pillar::People,
        subcategory: "Reactive Reality",
        target_role: TargetRole::Technician,
        weight: 1.2,
        evidence: None,
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "P-03",
        text: "If you see a safety or reliability risk, do you feel authorized to stop production?",
        pillar: Pillar::People,
        subcategory: "Empowerment",
        target_role: TargetRole::Technician,
        weight: 1.0,
        evidence: None,
        is_critical: true,
        binary: true,
    },
    QuestionTemplate {
        code: "P-04",
        text: "How is knowledge transferred from senior technicians to new hires?",
        pillar: Pillar::People,
        subcategory: "Knowledge Management",
        target_role: TargetRole::Manager,
        weight: 1.0,
        evidence: Some("Mentorship program documentation, knowledge base screenshots, or training records"),
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "P-05",
        text: "Does the maintenance budget include a dedicated line item for technician training?",
        pillar: Pillar::People,
        subcategory: "Investment in Competency",
        target_role: TargetRole::Manager,
        weight: 0.8,
        evidence: Some("Budget spreadsheet showing training allocation"),
        is_critical: false,
        binary: true,
    },
    QuestionTemplate {
        code: "PR-01",
        text: "Did the technician have the correct spare part available immediately?",
        pillar: Pillar::Process,
        subcategory: "Work Execution",
        target_role: TargetRole::Auditor,
        weight: 1.3,
        evidence: Some("Photo of part at the job site or note documenting delay and search time"),
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "PR-02",
        text: "Did the technician reference a Standard Operating Procedure (SOP) during the repair?",
        pillar: Pillar::Process,
        subcategory: "SOP Usage",
        target_role: TargetRole::Auditor,
        weight: 1.2,
        evidence: Some("Photo of SOP in use or note explaining why it was not referenced"),
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "PR-03",
        text: "Was the Lock-Out/Tag-Out (LOTO) procedure correctly applied before work started?",
        pillar: Pillar::Process,
        subcategory: "Safety Compliance",
        target_role: TargetRole::Auditor,
        weight: 2.0,
        evidence: Some("Photo of LOTO application or safety permit"),
        is_critical: true,
        binary: true,
    },
    QuestionTemplate {
        code: "PR-04",
        text: "What percentage of Work Orders have a detailed Job Plan attached?",
        pillar: Pillar::Process,
        subcategory: "Planning Quality",
        target_role: TargetRole::Planner,
        weight: 1.4,
        evidence: Some("CMMS report showing share of work orders with job plans, or a sample of 20"),
        is_critical: true,
        binary: false,
    },
    QuestionTemplate {
        code: "PR-05",
        text: "Are Preventive Maintenance (PM) tasks completed within their scheduled window?",
        pillar: Pillar::Process,
        subcategory: "PM Discipline",
        target_role: TargetRole::Planner,
        weight: 1.3,
        evidence: Some("CMMS PM compliance report showing on-time completion"),
        is_critical: true,
        binary: false,
    },
    QuestionTemplate {
        code: "T-01",
        text: "Pull 50 closed work orders. How many have generic closure codes like 'DONE' or 'FIXED'?",
        pillar: Pillar::Technology,
        subcategory: "Data Graveyard Detection",
        target_role: TargetRole::Auditor,
        weight: 1.5,
        evidence: Some("CMMS export showing closure codes or the spreadsheet analysis"),
        is_critical: true,
        binary: false,
    },
    QuestionTemplate {
        code: "T-02",
        text: "Do failure codes align with ISO 14224 taxonomy (Component - Failure Mode - Cause)?",
        pillar: Pillar::Technology,
        subcategory: "ISO 14224 Compliance",
        target_role: TargetRole::Auditor,
        weight: 1.2,
        evidence: Some("Failure code structure in the CMMS or a data export"),
        is_critical: true,
        binary: true,
    },
    QuestionTemplate {
        code: "T-03",
        text: "Can you generate a 'Bad Actor' report (Top 10 failing assets) in under 5 minutes?",
        pillar: Pillar::Technology,
        subcategory: "Reporting Capability",
        target_role: TargetRole::Manager,
        weight: 1.0,
        evidence: Some("Screenshot of the report or timer evidence"),
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "T-04",
        text: "Rate the difficulty of entering data into the current CMMS.",
        pillar: Pillar::Technology,
        subcategory: "System Usability",
        target_role: TargetRole::Technician,
        weight: 0.8,
        evidence: None,
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "T-05",
        text: "What is the asset hierarchy depth in the CMMS?",
        pillar: Pillar::Technology,
        subcategory: "Data Structure",
        target_role: TargetRole::Auditor,
        weight: 1.0,
        evidence: Some("Screenshot of asset hierarchy or CMMS structure export"),
        is_critical: false,
        binary: false,
    },
    QuestionTemplate {
        code: "T-06",
        text: "Are work order attachments (photos, manuals) easily accessible from the CMMS?",
        pillar: Pillar::Technology,
        subcategory: "Information Access",
        target_role: TargetRole::Technician,
        weight: 0.9,
        evidence: None,
        is_critical: false,
        binary: false,
    },
];
