use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for audit questions (e.g. `P-01`, `PR-03`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionCode(pub String);

impl QuestionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three audit dimensions every assessment is scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    People,
    Process,
    Technology,
}

impl Pillar {
    pub const ALL: [Pillar; 3] = [Pillar::People, Pillar::Process, Pillar::Technology];

    pub fn label(&self) -> &'static str {
        match self {
            Pillar::People => "People",
            Pillar::Process => "Process",
            Pillar::Technology => "Technology",
        }
    }
}

/// Respondent role a question is directed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRole {
    Technician,
    Manager,
    Planner,
    /// Field observations and CMMS-derived data gathered by the audit team.
    Auditor,
}

impl TargetRole {
    pub fn label(&self) -> &'static str {
        match self {
            TargetRole::Technician => "technician",
            TargetRole::Manager => "manager",
            TargetRole::Planner => "planner",
            TargetRole::Auditor => "auditor",
        }
    }
}

/// Declared answer scale for a question.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoreScale {
    /// Continuous range, inclusive on both ends.
    Range { min: f64, max: f64 },
    /// Pass/fail answer mapped onto {1, 5}.
    Binary,
}

impl ScoreScale {
    pub const BINARY_FAIL: f64 = 1.0;
    pub const BINARY_PASS: f64 = 5.0;

    pub fn likert() -> Self {
        ScoreScale::Range { min: 1.0, max: 5.0 }
    }

    pub fn contains(&self, score: f64) -> bool {
        if !score.is_finite() {
            return false;
        }
        match self {
            ScoreScale::Range { min, max } => score >= *min && score <= *max,
            ScoreScale::Binary => score == Self::BINARY_FAIL || score == Self::BINARY_PASS,
        }
    }
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self::likert()
    }
}

impl fmt::Display for ScoreScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreScale::Range { min, max } => write!(f, "{min}-{max}"),
            ScoreScale::Binary => write!(f, "pass/fail (1 or 5)"),
        }
    }
}

/// One audit question as referenced by an assessment.
///
/// Definitions are immutable once an assessment points at them; edits are expected to
/// arrive as a new definition rather than a mutation of this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub code: QuestionCode,
    #[serde(default)]
    pub text: String,
    pub pillar: Pillar,
    #[serde(default)]
    pub subcategory: String,
    pub target_role: TargetRole,
    pub weight: f64,
    #[serde(default)]
    pub evidence_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_description: Option<String>,
    #[serde(default)]
    pub is_critical: bool,
    #[serde(default)]
    pub scale: ScoreScale,
}

/// One answer to one question within an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub question_code: QuestionCode,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub evidence_provided: bool,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_na: bool,
}

impl Response {
    pub fn scored(question_code: QuestionCode, score: f64, evidence_provided: bool) -> Self {
        Self {
            question_code,
            score: Some(score),
            evidence_provided,
            is_draft: false,
            is_na: false,
        }
    }

    pub fn not_applicable(question_code: QuestionCode) -> Self {
        Self {
            question_code,
            score: None,
            evidence_provided: false,
            is_draft: false,
            is_na: true,
        }
    }
}

/// A response paired with the question it answers; the engine's unit of input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringInput {
    pub question: QuestionDefinition,
    pub response: Response,
}

impl ScoringInput {
    pub fn new(question: QuestionDefinition, response: Response) -> Self {
        Self { question, response }
    }
}

/// Qualitative reliability label for a pillar score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceGrade {
    Low,
    Medium,
    High,
}

impl ConfidenceGrade {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceGrade::Low => "Low",
            ConfidenceGrade::Medium => "Medium",
            ConfidenceGrade::High => "High",
        }
    }
}

/// Critical question answered at or below the failure threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalFailure {
    pub question_code: QuestionCode,
    pub score: f64,
}

/// Record of an evidence lock lowering a submitted score for aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceLockAdjustment {
    pub question_code: QuestionCode,
    pub submitted_score: f64,
    pub effective_score: f64,
}

/// Scored outcome for a single pillar.
///
/// `raw_score` and `final_score` are `None` when no eligible response exists, so an
/// unassessed pillar is never confused with one that scored at the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarResult {
    pub pillar: Pillar,
    pub raw_score: Option<f64>,
    pub final_score: Option<f64>,
    pub confidence: ConfidenceGrade,
    pub evidence_coverage: f64,
    pub critical_failures: Vec<CriticalFailure>,
    pub evidence_locks: Vec<EvidenceLockAdjustment>,
    pub response_count: usize,
}

impl PillarResult {
    pub fn is_assessed(&self) -> bool {
        self.final_score.is_some()
    }

    pub fn was_capped(&self) -> bool {
        match (self.raw_score, self.final_score) {
            (Some(raw), Some(final_score)) => final_score < raw,
            _ => false,
        }
    }
}

/// Maturity band derived from the overall index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaturityLevel {
    Reactive,
    EmergingPreventive,
    Preventive,
    Predictive,
    Prescriptive,
}

impl MaturityLevel {
    pub fn label(&self) -> &'static str {
        match self {
            MaturityLevel::Reactive => "Reactive",
            MaturityLevel::EmergingPreventive => "Emerging Preventive",
            MaturityLevel::Preventive => "Preventive",
            MaturityLevel::Predictive => "Predictive",
            MaturityLevel::Prescriptive => "Prescriptive",
        }
    }

    pub fn level(&self) -> u8 {
        match self {
            MaturityLevel::Reactive => 1,
            MaturityLevel::EmergingPreventive => 2,
            MaturityLevel::Preventive => 3,
            MaturityLevel::Predictive => 4,
            MaturityLevel::Prescriptive => 5,
        }
    }

    pub fn summary(&self) -> String {
        format!("Level {} - {}", self.level(), self.label())
    }
}

/// Complete scoring output for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentScoreResult {
    pub methodology_version: String,
    pub people: PillarResult,
    pub process: PillarResult,
    pub technology: PillarResult,
    pub overall_rmi: Option<f64>,
    pub maturity: Option<MaturityLevel>,
    pub overall_confidence: ConfidenceGrade,
}

impl AssessmentScoreResult {
    pub fn pillar(&self, pillar: Pillar) -> &PillarResult {
        match pillar {
            Pillar::People => &self.people,
            Pillar::Process => &self.process,
            Pillar::Technology => &self.technology,
        }
    }

    pub fn pillars(&self) -> [&PillarResult; 3] {
        [&self.people, &self.process, &self.technology]
    }

    pub fn maturity_label(&self) -> &'static str {
        self.maturity
            .map(|level| level.label())
            .unwrap_or("Not yet assessed")
    }
}
