use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use session_orchestrator::SessionOrchestrator;

use crate::handlers::{self, ApiCtx};

#[derive(Clone)]
pub struct RunAutomationApi {
    orchestrator: Arc<SessionOrchestrator>,
}

impl RunAutomationApi {
    pub fn new(orchestrator: Arc<SessionOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn build(self) -> Router {
        Router::new()
            .route("/status", get(handlers::status))
            .route("/api/run-automation", post(handlers::run_automation))
            .with_state(ApiCtx {
                orchestrator: self.orchestrator,
            })
    }
}
