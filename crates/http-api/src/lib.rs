//! HTTP surface (§6): `POST /api/run-automation` wires a `RunRequest` body
//! through the Session Orchestrator and maps its outcome/errors onto
//! response status codes.

mod bootstrap;
mod errors;
mod handlers;

pub use bootstrap::RunAutomationApi;
pub use errors::ApiError;
pub use handlers::ApiCtx;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use cdp_adapter::{event_bus, CdpAdapter, CdpConfig};
    use session_orchestrator::SessionOrchestrator;
    use soulbrowser_core_types::BrowserName;
    use std::sync::Arc;
    use test_catalog::{InMemoryResultStore, InMemoryTestCatalog};
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let (bus, _rx) = event_bus(16);
        let adapter = Arc::new(CdpAdapter::new(CdpConfig::default(), bus));
        let interpreter = Arc::new(action_primitives::DefaultActionInterpreter::new(
            adapter.clone(),
            Arc::new(action_primitives::DefaultWaitStrategy::default()),
        ));
        let evaluator = Arc::new(action_gate::DefaultAssertionEvaluator::new(adapter.clone()));
        let step_runner = Arc::new(action_flow::DefaultStepRunner::new(interpreter, evaluator));
        let catalog = Arc::new(InMemoryTestCatalog::new());
        let store = Arc::new(InMemoryResultStore::new());
        let orchestrator = Arc::new(SessionOrchestrator::new(
            adapter,
            step_runner,
            catalog,
            store,
            BrowserName::Chromium,
        ));
        RunAutomationApi::new(orchestrator).build()
    }

    #[tokio::test]
    async fn run_automation_rejects_empty_request_with_400() {
        let router = build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/run-automation")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn run_automation_returns_404_for_missing_test_case() {
        let router = build_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/run-automation")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"testCaseId":"missing"}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_endpoint_is_ok() {
        let router = build_router();
        let request = Request::builder()
            .method("GET")
            .uri("/status")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
