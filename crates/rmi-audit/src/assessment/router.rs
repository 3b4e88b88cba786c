use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::repository::{AssessmentId, AssessmentRepository, RepositoryError};
use super::service::{AssessmentScoringService, ScoringServiceError};

/// Router builder exposing scoring endpoints per assessment.
pub fn assessment_router<R>(service: Arc<AssessmentScoringService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:assessment_id/score",
            get(latest_handler::<R>).post(recompute_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/evidence-gaps",
            get(evidence_gaps_handler::<R>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/breakdown",
            get(breakdown_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn recompute_handler<R>(
    State(service): State<Arc<AssessmentScoringService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    respond(&id, service.recompute(&id))
}

pub(crate) async fn latest_handler<R>(
    State(service): State<Arc<AssessmentScoringService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    respond(&id, service.latest(&id))
}

pub(crate) async fn evidence_gaps_handler<R>(
    State(service): State<Arc<AssessmentScoringService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    let gaps = service.evidence_gaps(&id).map(|gaps| {
        json!({
            "assessment_id": id.0,
            "total_gaps": gaps.len(),
            "gaps": gaps,
        })
    });
    respond(&id, gaps)
}

pub(crate) async fn breakdown_handler<R>(
    State(service): State<Arc<AssessmentScoringService<R>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    let id = AssessmentId(assessment_id);
    respond(&id, service.breakdown(&id))
}

fn respond<T: Serialize>(id: &AssessmentId, outcome: Result<T, ScoringServiceError>) -> Response {
    match outcome {
        Ok(body) => (StatusCode::OK, axum::Json(body)).into_response(),
        Err(ScoringServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "assessment_id": id.0,
                "error": "assessment not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ScoringServiceError::NotScored(_)) => {
            let payload = json!({
                "assessment_id": id.0,
                "error": "assessment has not been scored yet",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(ScoringServiceError::Scoring(error)) => {
            let payload = json!({
                "assessment_id": id.0,
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
