//! Error types for capability execution

use actionbook_driver::DriverError;
use thiserror::Error;

/// Failures raised while a capability runs a step.
#[derive(Debug, Error)]
pub enum CapabilityError {
    /// The resolved selector or param cannot drive this verb
    #[error("Invalid parameter for '{verb}': {reason}")]
    InvalidParam { verb: String, reason: String },

    /// The underlying driver call failed
    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CapabilityError {
    pub fn invalid(verb: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParam {
            verb: verb.into(),
            reason: reason.into(),
        }
    }

    /// Whether the failure came out of the browser rather than the step data.
    pub fn is_driver_failure(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}
