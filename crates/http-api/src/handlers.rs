use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::Value;
use session_orchestrator::{RunOutcome, SessionOrchestrator};
use soulbrowser_core_types::RunRequest;

use crate::errors::ApiResult;

#[derive(Clone)]
pub struct ApiCtx {
    pub orchestrator: Arc<SessionOrchestrator>,
}

pub async fn status() -> impl IntoResponse {
    Json(serde_json::json!({ "ready": true }))
}

/// `POST /api/run-automation` (§6): 200 with a `TestReport` (single
/// `testCaseId`) or `OverallReport` (`moduleIds` batch) body.
pub async fn run_automation(
    State(ctx): State<ApiCtx>,
    Json(req): Json<RunRequest>,
) -> ApiResult<Json<Value>> {
    let outcome = ctx.orchestrator.run(req).await?;
    let body = match outcome {
        RunOutcome::Single(report) => serde_json::to_value(report),
        RunOutcome::Batch(report) => serde_json::to_value(report),
    }
    .unwrap_or(Value::Null);
    Ok(Json(body))
}
