use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::{
    assessment_router, AssessmentId, AssessmentRepository, AssessmentScoringService,
    AssessmentSnapshot, RepositoryError, ScoreRecord,
};
use crate::scoring::{
    Pillar, QuestionCode, QuestionDefinition, Response as AnswerRow, ScoreScale, ScoringEngine,
    ScoringInput, TargetRole,
};

pub(super) fn question(
    code: &str,
    pillar: Pillar,
    subcategory: &str,
    role: TargetRole,
    weight: f64,
) -> QuestionDefinition {
    QuestionDefinition {
        code: QuestionCode::new(code),
        text: format!("Question {code}"),
        pillar,
        subcategory: subcategory.to_string(),
        target_role: role,
        weight,
        evidence_required: false,
        evidence_description: None,
        is_critical: false,
        scale: ScoreScale::likert(),
    }
}

pub(super) fn answered(question: QuestionDefinition, score: f64, evidence: bool) -> ScoringInput {
    let response = AnswerRow::scored(question.code.clone(), score, evidence);
    ScoringInput::new(question, response)
}

/// Plant assessment with an unevidenced 5 on P-01 and a failed LOTO check.
pub(super) fn plant_snapshot(id: &str) -> AssessmentSnapshot {
    let mut p01 = question("P-01", Pillar::People, "Competency", TargetRole::Technician, 1.5);
    p01.evidence_required = true;
    p01.evidence_description = Some("Training matrix".to_string());

    let mut pr03 = question("PR-03", Pillar::Process, "Safety", TargetRole::Technician, 1.5);
    pr03.is_critical = true;
    pr03.scale = ScoreScale::Binary;

    AssessmentSnapshot {
        assessment_id: AssessmentId(id.to_string()),
        inputs: vec![
            answered(p01, 5.0, false),
            answered(
                question("P-05", Pillar::People, "Leadership", TargetRole::Manager, 0.8),
                3.0,
                false,
            ),
            answered(
                question("PR-01", Pillar::Process, "Planning", TargetRole::Planner, 1.3),
                4.0,
                true,
            ),
            answered(pr03, 1.0, true),
            answered(
                question("T-01", Pillar::Technology, "CMMS", TargetRole::Auditor, 1.5),
                3.0,
                true,
            ),
        ],
    }
}

pub(super) fn build_service() -> (
    AssessmentScoringService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentScoringService::new(repository.clone(), ScoringEngine::standard());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    snapshots: Arc<Mutex<HashMap<AssessmentId, AssessmentSnapshot>>>,
    scores: Arc<Mutex<HashMap<AssessmentId, ScoreRecord>>>,
}

impl MemoryRepository {
    pub(super) fn seed(&self, snapshot: AssessmentSnapshot) {
        self.snapshots
            .lock()
            .expect("repository mutex poisoned")
            .insert(snapshot.assessment_id.clone(), snapshot);
    }

    pub(super) fn score_count(&self) -> usize {
        self.scores.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn snapshot(&self, id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, RepositoryError> {
        let guard = self.snapshots.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn store_score(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        let mut guard = self.scores.lock().expect("repository mutex poisoned");
        guard.insert(record.assessment_id.clone(), record);
        Ok(())
    }

    fn latest_score(&self, id: &AssessmentId) -> Result<Option<ScoreRecord>, RepositoryError> {
        let guard = self.scores.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn snapshot(&self, _id: &AssessmentId) -> Result<Option<AssessmentSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn store_score(&self, _record: ScoreRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_score(&self, _id: &AssessmentId) -> Result<Option<ScoreRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: AssessmentScoringService<MemoryRepository>) -> axum::Router {
    assessment_router(Arc::new(service))
}
