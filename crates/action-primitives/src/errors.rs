//! Error types for action primitives

use thiserror::Error;

/// Errors raised while executing a single action. The Step Runner converts
/// any of these into a failed `StepResult` (spec §7).
#[derive(Debug, Error, Clone)]
pub enum ActionError {
    /// Navigation timed out waiting for page load
    #[error("Navigation timeout: {0}")]
    NavTimeout(String),

    /// Wait operation timed out
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// Element could not be resolved within the bounded wait
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// No frame matched the action's `iframeIdentifier`
    #[error("Frame not found: {0}")]
    FrameNotFound(String),

    /// Dropdown option was not found
    #[error("Option not found in dropdown: {0}")]
    OptionNotFound(String),

    /// An action or element kind this interpreter does not handle
    #[error("Unsupported action type: {0}")]
    UnsupportedActionType(String),

    /// A `change` target whose DOM kind (text/checkbox/radio/select) could
    /// not be determined
    #[error("Unsupported Type")]
    UnsupportedElementKind,

    /// Action-runtime failure: bounding box missing, fill failed, label
    /// fallback failed
    #[error("Action runtime error: {0}")]
    ActionRuntime(String),

    /// Driver lacks the raw input channel a drag action requires
    #[error("Capability not available: {0}")]
    CapabilityUnavailable(String),

    /// CDP communication or protocol error
    #[error("CDP I/O error: {0}")]
    CdpIo(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, ActionError::WaitTimeout(_) | ActionError::CdpIo(_))
    }

    /// Get error severity level (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            ActionError::Internal(_) => 3,
            ActionError::NavTimeout(_) | ActionError::CdpIo(_) | ActionError::FrameNotFound(_) => 2,
            ActionError::WaitTimeout(_) | ActionError::ElementNotFound(_) => 1,
            _ => 0,
        }
    }
}

impl From<action_locator::LocatorError> for ActionError {
    fn from(err: action_locator::LocatorError) -> Self {
        match err {
            action_locator::LocatorError::ElementNotFound(msg) => ActionError::ElementNotFound(msg),
            action_locator::LocatorError::FrameNotFound(msg) => ActionError::FrameNotFound(msg),
            action_locator::LocatorError::InvalidAnchor(msg) => ActionError::ActionRuntime(msg),
            action_locator::LocatorError::CdpError(msg) => ActionError::CdpIo(msg),
            action_locator::LocatorError::Timeout(msg) => ActionError::WaitTimeout(msg),
            action_locator::LocatorError::Internal(msg) => ActionError::Internal(msg),
        }
    }
}
