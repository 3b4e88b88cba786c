use crate::cli::ServeArgs;
use crate::demo::{sample_assessment, DEMO_ASSESSMENT_ID};
use crate::infra::{build_engine, AppState, InMemoryAssessmentRepository};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rmi_audit::assessment::AssessmentScoringService;
use rmi_audit::config::AppConfig;
use rmi_audit::error::AppError;
use rmi_audit::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = build_engine(None, config.scoring.methodology()?)?;
    info!(
        methodology = engine.methodology_version(),
        "scoring methodology loaded"
    );

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    repository.load(sample_assessment(DEMO_ASSESSMENT_ID));
    let scoring_service = Arc::new(AssessmentScoringService::new(repository.clone(), engine));

    let app = with_assessment_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(Extension(repository))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "rmi scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
