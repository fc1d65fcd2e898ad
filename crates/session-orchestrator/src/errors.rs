use thiserror::Error;

/// Orchestrator-level failures (spec §7). A thrown error while running a
/// single test case never reaches this enum — the orchestrator catches it
/// and synthesizes a one-step failing `TestReport` instead (§4.7 point 5);
/// this enum covers failures that abort the whole request.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("test case not found: {0}")]
    NotFound(String),

    #[error("unsupported browser engine: {0:?}")]
    UnsupportedEngine(soulbrowser_core_types::BrowserName),

    #[error("session setup failed: {0}")]
    SessionSetup(String),

    #[error("catalog error: {0}")]
    Catalog(String),
}

impl From<cdp_adapter::AdapterError> for OrchestratorError {
    fn from(err: cdp_adapter::AdapterError) -> Self {
        OrchestratorError::SessionSetup(err.to_string())
    }
}

impl From<test_catalog::CatalogError> for OrchestratorError {
    fn from(err: test_catalog::CatalogError) -> Self {
        OrchestratorError::Catalog(err.to_string())
    }
}
