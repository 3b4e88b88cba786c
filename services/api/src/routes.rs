use crate::infra::{AppState, InMemoryAssessmentRepository};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rmi_audit::assessment::{
    assessment_router, AssessmentId, AssessmentRepository, AssessmentScoringService,
    AssessmentSnapshot,
};
use rmi_audit::scoring::{eligible_inputs, ScoringInput};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

pub(crate) fn with_assessment_routes<R>(service: Arc<AssessmentScoringService<R>>) -> axum::Router
where
    R: AssessmentRepository + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/assessments/:assessment_id/snapshot",
            axum::routing::put(load_snapshot_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Load the responses for an assessment; scoring happens on the next POST to `/score`.
pub(crate) async fn load_snapshot_endpoint(
    Extension(repository): Extension<Arc<InMemoryAssessmentRepository>>,
    Path(assessment_id): Path<String>,
    Json(inputs): Json<Vec<ScoringInput>>,
) -> impl IntoResponse {
    let eligible = eligible_inputs(&inputs).len();
    let snapshot = AssessmentSnapshot {
        assessment_id: AssessmentId(assessment_id),
        inputs,
    };
    info!(
        assessment = %snapshot.assessment_id,
        responses = snapshot.inputs.len(),
        eligible,
        "assessment snapshot loaded"
    );

    let payload = json!({
        "assessment_id": snapshot.assessment_id.0,
        "responses": snapshot.inputs.len(),
        "eligible_responses": eligible,
    });
    repository.load(snapshot);

    (StatusCode::OK, Json(payload))
}
