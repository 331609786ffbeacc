use std::sync::Arc;

use crate::crs::feedback::FeedbackLog;
use crate::llm_client::ScoringModel;
use crate::recruiting::repository::{
    CandidateRepository, InMemoryCandidates, InMemoryRequisitions, RequisitionRepository,
};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no provider credential is configured; `/api/score` then
    /// answers with a configuration error.
    pub scorer: Option<Arc<dyn ScoringModel>>,
    pub requisitions: Arc<dyn RequisitionRepository>,
    pub candidates: Arc<dyn CandidateRepository>,
    pub feedback: Arc<FeedbackLog>,
}

impl AppState {
    /// State backed by in-memory repositories holding the sample records.
    pub fn seeded(scorer: Option<Arc<dyn ScoringModel>>) -> Self {
        AppState {
            scorer,
            requisitions: Arc::new(InMemoryRequisitions::seeded()),
            candidates: Arc::new(InMemoryCandidates::seeded()),
            feedback: Arc::new(FeedbackLog::default()),
        }
    }
}
