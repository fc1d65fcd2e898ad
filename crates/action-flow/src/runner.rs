//! Step Runner (spec §4.6): walks a test case's actions in order, running
//! each through the Action Interpreter and then, if the action itself
//! succeeded, the Assertion Evaluator. Produces one `StepResult` per
//! executed step.
//!
//! Two modes:
//! - [`StepRunner::run_stop_on_failure`], used for all persisted runs: stop
//!   at the first failing step.
//! - [`StepRunner::run_best_effort`], the legacy mode: keep going after a
//!   failed step, stopping only if a step could not be executed at all.
//!
//! The runner never closes the browser; the page/context/browser lifecycle
//! belongs to the Session Orchestrator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use action_gate::AssertionEvaluator;
use action_primitives::{ActionInterpreter, ExecCtx};
use async_trait::async_trait;
use cdp_adapter::PageId;
use soulbrowser_core_types::{Action, StepResult, StepStatus};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Generous ceiling for a single action's `ExecCtx` deadline. The
/// per-operation deadlines that actually matter (selector waits, frame
/// locate, navigate-assert, download assert) are enforced further down by
/// the Element Resolver, Frame Locator, and CDP adapter themselves; this
/// bound only needs to outlast the slowest of those.
const ACTION_DEADLINE: Duration = Duration::from_secs(30);

#[async_trait]
pub trait StepRunner: Send + Sync {
    /// Stop-on-failure mode: run `actions` against `page`, appending a
    /// `StepResult` per step, and stop as soon as one step fails (action
    /// failure or a failed assertion).
    async fn run_stop_on_failure(&self, page: PageId, actions: &[Action]) -> Vec<StepResult>;

    /// Best-effort mode: run every action regardless of pass/fail, stopping
    /// only if an action cannot be executed at all.
    async fn run_best_effort(&self, page: PageId, actions: &[Action]) -> Vec<StepResult>;
}

pub struct DefaultStepRunner {
    interpreter: Arc<dyn ActionInterpreter>,
    evaluator: Arc<dyn AssertionEvaluator>,
}

impl DefaultStepRunner {
    pub fn new(
        interpreter: Arc<dyn ActionInterpreter>,
        evaluator: Arc<dyn AssertionEvaluator>,
    ) -> Self {
        Self {
            interpreter,
            evaluator,
        }
    }

    /// Runs one action and its assertions, producing the `StepResult` the
    /// caller appends. Assertions run regardless of the action's own
    /// outcome (§4.4, I4); a failing assertion wins the step's message, and
    /// the step only passes if the action succeeded AND every assertion
    /// passed (P5).
    async fn run_one(&self, page: PageId, action: &Action, next: Option<&Action>, index: usize) -> StepResult {
        let ctx = ExecCtx::new(Instant::now() + ACTION_DEADLINE, CancellationToken::new());
        let report = self.interpreter.execute(&ctx, page, action, next).await;
        let assertions = self.evaluator.evaluate(page, action).await;
        let first_failed_assertion = assertions.iter().find(|a| !a.success);

        let (status, message) = match first_failed_assertion {
            Some(failed) => (StepStatus::Fail, failed.message.clone()),
            None => (StepStatus::from_bool(report.ok), report.message),
        };

        StepResult {
            sequence: action.sequence_or(index),
            description: action.description_or_type(),
            status,
            message,
            assertions,
        }
    }
}

#[async_trait]
impl StepRunner for DefaultStepRunner {
    async fn run_stop_on_failure(&self, page: PageId, actions: &[Action]) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let next = actions.get(index + 1);
            let result = self.run_one(page, action, next, index).await;
            let passed = result.status.is_pass();
            results.push(result);
            if !passed {
                break;
            }
            sleep(Duration::from_secs_f64(action.wait_seconds())).await;
        }
        results
    }

    async fn run_best_effort(&self, page: PageId, actions: &[Action]) -> Vec<StepResult> {
        let mut results = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let next = actions.get(index + 1);
            let result = self.run_one(page, action, next, index).await;
            results.push(result);
        }
        results
    }
}
