use crate::scoring::{
    Pillar, QuestionCode, QuestionDefinition, Response, ScoreScale, ScoringInput, TargetRole,
};

pub(super) const TOLERANCE: f64 = 1e-9;

pub(super) fn question(
    code: &str,
    pillar: Pillar,
    role: TargetRole,
    weight: f64,
) -> QuestionDefinition {
    QuestionDefinition {
        code: QuestionCode::new(code),
        text: format!("Question {code}"),
        pillar,
        subcategory: "General".to_string(),
        target_role: role,
        weight,
        evidence_required: false,
        evidence_description: None,
        is_critical: false,
        scale: ScoreScale::likert(),
    }
}

pub(super) fn evidenced(mut question: QuestionDefinition) -> QuestionDefinition {
    question.evidence_required = true;
    question.evidence_description = Some("Training records or CMMS export".to_string());
    question
}

pub(super) fn critical(mut question: QuestionDefinition) -> QuestionDefinition {
    question.is_critical = true;
    question
}

pub(super) fn binary(mut question: QuestionDefinition) -> QuestionDefinition {
    question.scale = ScoreScale::Binary;
    question
}

pub(super) fn answered(question: QuestionDefinition, score: f64, evidence: bool) -> ScoringInput {
    let response = Response::scored(question.code.clone(), score, evidence);
    ScoringInput::new(question, response)
}

pub(super) fn draft(question: QuestionDefinition, score: f64) -> ScoringInput {
    let mut input = answered(question, score, false);
    input.response.is_draft = true;
    input
}

pub(super) fn not_applicable(question: QuestionDefinition) -> ScoringInput {
    let response = Response::not_applicable(question.code.clone());
    ScoringInput::new(question, response)
}

/// P-01 (technician, evidence required) and P-05 (manager) from the people pillar.
pub(super) fn competency_pair(p01_score: f64, p01_evidence: bool) -> Vec<ScoringInput> {
    vec![
        answered(
            evidenced(question("P-01", Pillar::People, TargetRole::Technician, 1.5)),
            p01_score,
            p01_evidence,
        ),
        answered(
            question("P-05", Pillar::People, TargetRole::Manager, 0.8),
            1.0,
            false,
        ),
    ]
}

/// Process pillar with a strong average and a failed LOTO check.
pub(super) fn process_with_loto_failure(loto_score: f64) -> Vec<ScoringInput> {
    vec![
        answered(
            evidenced(question("PR-01", Pillar::Process, TargetRole::Auditor, 1.3)),
            5.0,
            true,
        ),
        answered(
            evidenced(question("PR-02", Pillar::Process, TargetRole::Auditor, 1.2)),
            5.0,
            true,
        ),
        answered(
            critical(evidenced(binary(question(
                "PR-03",
                Pillar::Process,
                TargetRole::Auditor,
                2.0,
            )))),
            loto_score,
            true,
        ),
        answered(
            evidenced(question("PR-04", Pillar::Process, TargetRole::Planner, 1.4)),
            4.0,
            true,
        ),
        answered(
            evidenced(question("PR-05", Pillar::Process, TargetRole::Planner, 1.3)),
            4.0,
            true,
        ),
    ]
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}
