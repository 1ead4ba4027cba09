//! Run reporting port
//!
//! The engine forwards definition titles, descriptions and failure artifacts
//! to whatever reporting sink is wired in. Annotation never affects the run
//! outcome; sink failures are logged by the engine and swallowed.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

/// Reporting sink failure.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ReportError(pub String);

impl ReportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// External reporting collaborator.
#[async_trait]
pub trait Reporter: Send + Sync {
    /// Human-readable title of the running definition.
    async fn annotate_title(&self, title: &str);

    /// Longer description of the running definition.
    async fn annotate_description(&self, description: &str);

    /// Stores a failure artifact (screenshot bytes).
    async fn attach_artifact(&self, label: &str, bytes: &[u8]) -> Result<(), ReportError>;
}

/// Reporter that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

#[async_trait]
impl Reporter for NoopReporter {
    async fn annotate_title(&self, title: &str) {
        debug!(title, "noop reporter: title");
    }

    async fn annotate_description(&self, description: &str) {
        debug!(description, "noop reporter: description");
    }

    async fn attach_artifact(&self, label: &str, bytes: &[u8]) -> Result<(), ReportError> {
        debug!(label, size = bytes.len(), "noop reporter: dropping artifact");
        Ok(())
    }
}
