//! Session Orchestrator (spec §4.7): the top-level collaborator that turns a
//! `RunRequest` into one shared browser session, seeds login state, runs the
//! test case (or batch) against it, and always closes the browser.

mod errors;
mod orchestrator;
mod request;
mod seeding;

pub use errors::OrchestratorError;
pub use orchestrator::{RunOutcome, SessionOrchestrator};
pub use request::{validate, RunPlan};
