//! Step Runner (spec §4.6): runs a test case's actions in order, composing
//! the Action Interpreter and Assertion Evaluator into per-step results.
//! Owns no browser resources; lifecycle belongs to the Session Orchestrator.

mod runner;

pub use runner::{DefaultStepRunner, StepRunner};
