use metrics_exporter_prometheus::PrometheusHandle;
use rmi_audit::assessment::{
    AssessmentId, AssessmentRepository, AssessmentSnapshot, RepositoryError, ScoreRecord,
};
use rmi_audit::config::load_methodology;
use rmi_audit::error::AppError;
use rmi_audit::scoring::{ScoringConfig, ScoringEngine};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    snapshots: Arc<Mutex<HashMap<AssessmentId, AssessmentSnapshot>>>,
    scores: Arc<Mutex<HashMap<AssessmentId, ScoreRecord>>>,
}

impl InMemoryAssessmentRepository {
    /// Replace the responses held for an assessment.
    pub(crate) fn load(&self, snapshot: AssessmentSnapshot) {
        let mut guard = self.snapshots.lock().expect("repository mutex poisoned");
        guard.insert(snapshot.assessment_id.clone(), snapshot);
    }
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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

pub(crate) fn read_snapshot(path: &Path) -> Result<AssessmentSnapshot, AppError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Engine for an explicit methodology file, falling back to the configured one.
pub(crate) fn build_engine(
    methodology: Option<&Path>,
    fallback: ScoringConfig,
) -> Result<ScoringEngine, AppError> {
    let config = match methodology {
        Some(path) => load_methodology(path)?,
        None => fallback,
    };
    Ok(ScoringEngine::new(config)?)
}
