//! Assembles the service's collaborators from a `ServiceConfig`: the CDP
//! adapter, the action interpreter / assertion evaluator / step runner
//! stack, the catalog/store pair, and the `SessionOrchestrator` that ties
//! them together.

use std::sync::Arc;

use action_flow::DefaultStepRunner;
use action_gate::DefaultAssertionEvaluator;
use action_primitives::{DefaultActionInterpreter, DefaultWaitStrategy};
use cdp_adapter::{event_bus, CdpAdapter};
use session_orchestrator::SessionOrchestrator;
use test_catalog::{InMemoryResultStore, InMemoryTestCatalog};

use crate::config::ServiceConfig;

pub const EVENT_BUS_BUFFER: usize = 1024;

pub struct Service {
    pub adapter: Arc<CdpAdapter>,
    pub orchestrator: Arc<SessionOrchestrator>,
}

/// Builds the full collaborator graph but does not start the adapter's
/// transport — the caller decides when to call `adapter.start()` and when
/// to flip readiness.
pub fn build(config: &ServiceConfig) -> Service {
    let (bus, _events) = event_bus(EVENT_BUS_BUFFER);
    let adapter = Arc::new(CdpAdapter::new(config.cdp.clone(), bus));

    let wait_strategy = Arc::new(DefaultWaitStrategy::default());
    let interpreter = Arc::new(DefaultActionInterpreter::new(adapter.clone(), wait_strategy));
    let evaluator = Arc::new(DefaultAssertionEvaluator::new(adapter.clone()));
    let step_runner = Arc::new(DefaultStepRunner::new(interpreter, evaluator));

    let catalog = Arc::new(InMemoryTestCatalog::new());
    let store = Arc::new(InMemoryResultStore::new());

    let orchestrator = Arc::new(SessionOrchestrator::new(
        adapter.clone(),
        step_runner,
        catalog,
        store,
        config.default_browser,
    ));

    Service {
        adapter,
        orchestrator,
    }
}
