//! Driving contract and the no-op adapter

use async_trait::async_trait;
use tracing::debug;

use crate::errors::DriverError;
use crate::locator::Locator;
use crate::types::DriverTimeouts;

/// Everything a capability may ask of a browser.
///
/// Implementations own the bounded waits (see
/// [`DriverTimeouts`](crate::DriverTimeouts)); a call returns only after the
/// wait has settled one way or the other. One driver serves one browser
/// session, and calls against it are strictly sequential.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigates the session to `url` and waits for page readiness.
    async fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Clicks the element at `locator` once it is interactable.
    async fn click(&self, locator: &Locator) -> Result<(), DriverError>;

    /// Replaces the text content of the element at `locator`.
    async fn set_text(&self, locator: &Locator, text: &str) -> Result<(), DriverError>;

    /// Reads the visible text of the element at `locator`.
    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError>;

    /// Title of the current page.
    async fn current_title(&self) -> Result<String, DriverError>;

    /// Best-effort capture of a failure artifact. Returns screenshot bytes
    /// when the adapter can produce them, an empty buffer when it cannot.
    async fn capture_failure_artifact(&self) -> Result<Vec<u8>, DriverError>;
}

/// Driver that performs nothing and succeeds at everything.
///
/// Useful for validating definitions and wiring without a browser; every call
/// is logged with the wait budget that would bound it, so a dry run still
/// shows the driving intent. The budgets come through the same constructor
/// seam a concrete driver uses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDriver {
    timeouts: DriverTimeouts,
}

impl NoopDriver {
    pub fn with_timeouts(timeouts: DriverTimeouts) -> Self {
        Self { timeouts }
    }
}

#[async_trait]
impl BrowserDriver for NoopDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        debug!(url, budget_ms = self.timeouts.page_ready_ms, "noop driver: navigate");
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriverError> {
        debug!(%locator, budget_ms = self.timeouts.clickable_ms, "noop driver: click");
        Ok(())
    }

    async fn set_text(&self, locator: &Locator, text: &str) -> Result<(), DriverError> {
        debug!(%locator, text, budget_ms = self.timeouts.clickable_ms, "noop driver: set_text");
        Ok(())
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError> {
        debug!(%locator, budget_ms = self.timeouts.element_visible_ms, "noop driver: read_text");
        Ok(String::new())
    }

    async fn current_title(&self) -> Result<String, DriverError> {
        debug!("noop driver: current_title");
        Ok(String::new())
    }

    async fn capture_failure_artifact(&self) -> Result<Vec<u8>, DriverError> {
        debug!("noop driver: capture_failure_artifact");
        Ok(Vec::new())
    }
}
