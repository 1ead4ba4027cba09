//! Error types for browser driving

use thiserror::Error;

/// Failures surfaced by a driving adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// A bounded wait expired before the page or element was ready
    #[error("Timed out after {timeout_ms}ms: {what}")]
    Timeout { what: String, timeout_ms: u64 },

    /// No element matched the locator
    #[error("Element not found: {0}")]
    NotFound(String),

    /// Element matched but cannot be interacted with
    #[error("Element not interactable: {0}")]
    NotInteractable(String),

    /// Transport or session failure
    #[error("Driver I/O error: {0}")]
    Io(String),
}

impl DriverError {
    /// Timeouts and element-state failures may clear on a later attempt;
    /// transport failures will not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::NotInteractable(_))
    }
}
