//! Error types for locator system

use thiserror::Error;

/// Locator error enumeration
#[derive(Debug, Error, Clone)]
pub enum LocatorError {
    /// Neither `uniqueSelector` nor any `xpath` entry resolved an element.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An element descriptor carried neither `uniqueSelector` nor `xpath`.
    #[error("Invalid element descriptor: {0}")]
    InvalidAnchor(String),

    /// No frame's origin+path matched the requested `iframeIdentifier`.
    #[error("Frame not found: {0}")]
    FrameNotFound(String),

    /// CDP communication error
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Timeout during resolution
    #[error("Resolution timeout: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LocatorError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, LocatorError::Timeout(_) | LocatorError::CdpError(_))
    }

    /// Get error severity (0=low, 1=medium, 2=high, 3=critical)
    pub fn severity(&self) -> u8 {
        match self {
            LocatorError::Internal(_) => 3,
            LocatorError::CdpError(_) | LocatorError::Timeout(_) => 2,
            LocatorError::ElementNotFound(_) | LocatorError::FrameNotFound(_) => 1,
            LocatorError::InvalidAnchor(_) => 0,
        }
    }
}
