//! Recording driver for tests
//!
//! Records every call in order, serves scripted text reads, and can inject a
//! failure at a chosen driving-call index. Artifact capture and title reads
//! are recorded too but never count toward the failure index, so a failure
//! injected "at step N" stays aimed at step N even after the engine takes its
//! failure screenshot.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::api::BrowserDriver;
use crate::errors::DriverError;
use crate::locator::Locator;

/// One recorded driver call. Locators are kept as their raw expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverCall {
    Navigate { url: String },
    Click { locator: String },
    SetText { locator: String, text: String },
    ReadText { locator: String },
    CurrentTitle,
    CaptureFailureArtifact,
}

/// In-memory driver double.
///
/// Configure with the `with_*` builders before wiring it in, then assert on
/// [`RecordingDriver::calls`] afterwards.
pub struct RecordingDriver {
    texts: HashMap<String, String>,
    title: String,
    artifact: Vec<u8>,
    fail_capture: bool,
    fail_at: Option<(usize, DriverError)>,
    calls: Mutex<Vec<DriverCall>>,
    driving_calls: Mutex<usize>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            title: String::new(),
            artifact: b"\x89PNG\r\n\x1a\n".to_vec(),
            fail_capture: false,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
            driving_calls: Mutex::new(0),
        }
    }

    /// Scripts the text returned by `read_text` for a raw selector.
    pub fn with_text(mut self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(locator.into(), text.into());
        self
    }

    /// Scripts the page title returned by `current_title`.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the bytes served by `capture_failure_artifact`.
    pub fn with_artifact(mut self, bytes: Vec<u8>) -> Self {
        self.artifact = bytes;
        self
    }

    /// Makes the `index`-th driving call (0-based; navigate/click/set_text/
    /// read_text only) fail with `err`.
    pub fn fail_on_call(mut self, index: usize, err: DriverError) -> Self {
        self.fail_at = Some((index, err));
        self
    }

    /// Makes artifact capture itself fail.
    pub fn fail_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Everything recorded so far, in call order.
    pub fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: DriverCall) {
        self.calls.lock().push(call);
    }

    fn advance_driving_call(&self) -> Result<(), DriverError> {
        let mut counter = self.driving_calls.lock();
        let index = *counter;
        *counter += 1;
        match &self.fail_at {
            Some((fail_index, err)) if index == *fail_index => Err(err.clone()),
            _ => Ok(()),
        }
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserDriver for RecordingDriver {
    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.record(DriverCall::Navigate {
            url: url.to_string(),
        });
        self.advance_driving_call()
    }

    async fn click(&self, locator: &Locator) -> Result<(), DriverError> {
        self.record(DriverCall::Click {
            locator: locator.expression().to_string(),
        });
        self.advance_driving_call()
    }

    async fn set_text(&self, locator: &Locator, text: &str) -> Result<(), DriverError> {
        self.record(DriverCall::SetText {
            locator: locator.expression().to_string(),
            text: text.to_string(),
        });
        self.advance_driving_call()
    }

    async fn read_text(&self, locator: &Locator) -> Result<String, DriverError> {
        self.record(DriverCall::ReadText {
            locator: locator.expression().to_string(),
        });
        self.advance_driving_call()?;
        Ok(self
            .texts
            .get(locator.expression())
            .cloned()
            .unwrap_or_default())
    }

    async fn current_title(&self) -> Result<String, DriverError> {
        self.record(DriverCall::CurrentTitle);
        Ok(self.title.clone())
    }

    async fn capture_failure_artifact(&self) -> Result<Vec<u8>, DriverError> {
        self.record(DriverCall::CaptureFailureArtifact);
        if self.fail_capture {
            return Err(DriverError::Io("artifact capture unavailable".to_string()));
        }
        Ok(self.artifact.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let driver = RecordingDriver::new();
        driver.navigate("https://example.com").await.unwrap();
        driver.click(&Locator::parse("#go")).await.unwrap();
        driver
            .set_text(&Locator::parse("#q"), "rust")
            .await
            .unwrap();

        assert_eq!(
            driver.calls(),
            vec![
                DriverCall::Navigate {
                    url: "https://example.com".to_string()
                },
                DriverCall::Click {
                    locator: "#go".to_string()
                },
                DriverCall::SetText {
                    locator: "#q".to_string(),
                    text: "rust".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn serves_scripted_text() {
        let driver = RecordingDriver::new().with_text("#result", "42 hits");
        let text = driver.read_text(&Locator::parse("#result")).await.unwrap();
        assert_eq!(text, "42 hits");

        let missing = driver.read_text(&Locator::parse("#other")).await.unwrap();
        assert_eq!(missing, "");
    }

    #[tokio::test]
    async fn injected_failure_hits_the_chosen_call() {
        let driver = RecordingDriver::new().fail_on_call(
            1,
            DriverError::NotFound("#missing".to_string()),
        );
        driver.navigate("https://example.com").await.unwrap();
        let err = driver.click(&Locator::parse("#missing")).await.unwrap_err();
        assert_eq!(err, DriverError::NotFound("#missing".to_string()));
        assert!(!err.is_retryable());
        // The failed attempt is still on record.
        assert_eq!(driver.call_count(), 2);
    }

    #[tokio::test]
    async fn capture_does_not_advance_the_failure_index() {
        let driver = RecordingDriver::new().fail_on_call(
            1,
            DriverError::Io("boom".to_string()),
        );
        driver.navigate("https://example.com").await.unwrap();
        driver.capture_failure_artifact().await.unwrap();
        driver.current_title().await.unwrap();
        assert!(driver.click(&Locator::parse("#go")).await.is_err());
    }

    #[tokio::test]
    async fn capture_failure_can_be_injected() {
        let driver = RecordingDriver::new().fail_capture();
        assert!(driver.capture_failure_artifact().await.is_err());
    }
}
