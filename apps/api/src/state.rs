use std::sync::Arc;

use crate::interview::gateway::InterviewGateway;
use crate::interview::orchestrator::InterviewOrchestrator;
use crate::interview::repository::InterviewRepository;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub interviews: InterviewOrchestrator,
}

impl AppState {
    pub fn new(repo: Arc<dyn InterviewRepository>, model: Arc<dyn TextModel>) -> Self {
        Self {
            interviews: InterviewOrchestrator::new(repo, InterviewGateway::new(model)),
        }
    }
}
