//! Core data types for action primitives

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::errors::ActionError;

/// Execution context for a single action.
///
/// Frame routing is resolved separately by the Frame Locator
/// (`action_locator::FrameLocator`); this context only carries the
/// per-action deadline, cancellation, and a correlation id.
#[derive(Clone)]
pub struct ExecCtx {
    /// Deadline for this operation
    pub deadline: Instant,

    /// Cancellation token for cooperative cancellation
    pub cancel_token: CancellationToken,

    /// Unique identifier for this action
    pub action_id: String,
}

impl ExecCtx {
    /// Create a new execution context
    pub fn new(deadline: Instant, cancel_token: CancellationToken) -> Self {
        Self {
            deadline,
            cancel_token,
            action_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Check if this context has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    /// Check if this context has exceeded its deadline
    pub fn is_timeout(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Get remaining time until deadline
    pub fn remaining_time(&self) -> std::time::Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

/// Built-in waiting tiers. The network-idle tier backs the interpreter's
/// disabled-by-default network-idle hook (spec §4.4: "a network-idle wait
/// is an intended hook but is currently disabled").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitTier {
    /// No built-in waiting
    None,

    /// Wait for DOM ready event
    DomReady,

    /// Wait for page idle (DOM ready + network quiet)
    Idle,
}

impl Default for WaitTier {
    fn default() -> Self {
        WaitTier::DomReady
    }
}

/// Outcome of executing one action, before assertions run. Carries the
/// human-readable message the Step Runner surfaces on `StepResult.message`
/// when the action itself fails (spec §4.4, §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    pub ok: bool,
    pub message: String,
}

impl ActionReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn failure(error: ActionError) -> Self {
        Self {
            ok: false,
            message: error.to_string(),
        }
    }
}
