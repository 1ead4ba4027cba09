//! Built-in capabilities: `open`, `click`, `input`, `gettext`

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use actionbook_driver::{BrowserDriver, Locator};

use crate::api::{Capability, CapabilityRegistry};
use crate::errors::CapabilityError;

/// Registers the four stock verbs.
pub(crate) fn register_all(registry: &CapabilityRegistry) {
    registry.register("open", open_ctor);
    registry.register("click", click_ctor);
    registry.register("input", input_ctor);
    registry.register("gettext", gettext_ctor);
}

fn open_ctor(driver: Arc<dyn BrowserDriver>) -> Arc<dyn Capability> {
    Arc::new(OpenCapability { driver })
}

fn click_ctor(driver: Arc<dyn BrowserDriver>) -> Arc<dyn Capability> {
    Arc::new(ClickCapability { driver })
}

fn input_ctor(driver: Arc<dyn BrowserDriver>) -> Arc<dyn Capability> {
    Arc::new(InputCapability { driver })
}

fn gettext_ctor(driver: Arc<dyn BrowserDriver>) -> Arc<dyn Capability> {
    Arc::new(GetTextCapability { driver })
}

/// `open`: navigates to the URL carried in the step's selector field.
struct OpenCapability {
    driver: Arc<dyn BrowserDriver>,
}

#[async_trait]
impl Capability for OpenCapability {
    async fn execute(
        &self,
        locator: Option<&Value>,
        _data: Option<&Value>,
    ) -> Result<Option<Value>, CapabilityError> {
        let url = require_text("open", "selector", locator)?;
        self.driver.navigate(&url).await?;
        Ok(None)
    }
}

/// `click`: clicks the element addressed by the selector.
struct ClickCapability {
    driver: Arc<dyn BrowserDriver>,
}

#[async_trait]
impl Capability for ClickCapability {
    async fn execute(
        &self,
        locator: Option<&Value>,
        _data: Option<&Value>,
    ) -> Result<Option<Value>, CapabilityError> {
        let locator = require_locator("click", locator)?;
        self.driver.click(&locator).await?;
        Ok(None)
    }
}

/// `input`: types the param text into the element addressed by the selector.
struct InputCapability {
    driver: Arc<dyn BrowserDriver>,
}

#[async_trait]
impl Capability for InputCapability {
    async fn execute(
        &self,
        locator: Option<&Value>,
        data: Option<&Value>,
    ) -> Result<Option<Value>, CapabilityError> {
        let locator = require_locator("input", locator)?;
        let text = require_scalar_text("input", "param", data)?;
        self.driver.set_text(&locator, &text).await?;
        Ok(None)
    }
}

/// `gettext`: reads the element's text and returns it keyed under the param
/// string, so the run results carry `{param: text}`.
struct GetTextCapability {
    driver: Arc<dyn BrowserDriver>,
}

#[async_trait]
impl Capability for GetTextCapability {
    async fn execute(
        &self,
        locator: Option<&Value>,
        data: Option<&Value>,
    ) -> Result<Option<Value>, CapabilityError> {
        let locator = require_locator("gettext", locator)?;
        let key = require_text("gettext", "param", data)?;
        let text = self.driver.read_text(&locator).await?;
        debug!(key = %key, text = %text, "captured element text");

        let mut out = Map::new();
        out.insert(key, Value::String(text));
        Ok(Some(Value::Object(out)))
    }
}

/// Extracts a non-empty string field, rejecting anything else.
fn require_text(verb: &str, field: &str, value: Option<&Value>) -> Result<String, CapabilityError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(other) => Err(CapabilityError::invalid(
            verb,
            format!("{field} must be a non-empty string, got {other}"),
        )),
        None => Err(CapabilityError::invalid(verb, format!("{field} is required"))),
    }
}

/// Extracts text from a scalar field; numbers and booleans type out as their
/// display forms, structured values are rejected.
fn require_scalar_text(
    verb: &str,
    field: &str,
    value: Option<&Value>,
) -> Result<String, CapabilityError> {
    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(CapabilityError::invalid(
            verb,
            format!("{field} must be a string, number or boolean, got {other}"),
        )),
        None => Err(CapabilityError::invalid(verb, format!("{field} is required"))),
    }
}

fn require_locator(verb: &str, value: Option<&Value>) -> Result<Locator, CapabilityError> {
    let raw = require_text(verb, "selector", value)?;
    Ok(Locator::parse(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionbook_driver::{DriverCall, RecordingDriver};
    use serde_json::json;

    fn driver() -> Arc<RecordingDriver> {
        Arc::new(RecordingDriver::new())
    }

    #[tokio::test]
    async fn open_navigates_to_the_selector_url() {
        let recording = driver();
        let capability = open_ctor(recording.clone());
        capability
            .execute(Some(&json!("https://example.com")), None)
            .await
            .unwrap();
        assert_eq!(
            recording.calls(),
            vec![DriverCall::Navigate {
                url: "https://example.com".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn open_rejects_a_missing_url() {
        let capability = open_ctor(driver());
        let err = capability.execute(None, None).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidParam { .. }));
    }

    #[tokio::test]
    async fn click_drives_the_parsed_locator() {
        let recording = driver();
        let capability = click_ctor(recording.clone());
        capability.execute(Some(&json!("#go")), None).await.unwrap();
        assert_eq!(
            recording.calls(),
            vec![DriverCall::Click {
                locator: "#go".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn input_types_the_param_text() {
        let recording = driver();
        let capability = input_ctor(recording.clone());
        capability
            .execute(Some(&json!("#q")), Some(&json!("rust testing")))
            .await
            .unwrap();
        assert_eq!(
            recording.calls(),
            vec![DriverCall::SetText {
                locator: "#q".to_string(),
                text: "rust testing".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn input_accepts_numeric_params() {
        let recording = driver();
        let capability = input_ctor(recording.clone());
        capability
            .execute(Some(&json!("#count")), Some(&json!(42)))
            .await
            .unwrap();
        assert_eq!(
            recording.calls(),
            vec![DriverCall::SetText {
                locator: "#count".to_string(),
                text: "42".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn input_rejects_structured_params() {
        let capability = input_ctor(driver());
        let err = capability
            .execute(Some(&json!("#q")), Some(&json!({"nested": true})))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidParam { .. }));
    }

    #[tokio::test]
    async fn gettext_returns_the_text_under_the_param_key() {
        let recording = Arc::new(RecordingDriver::new().with_text("#result", "42 hits"));
        let capability = gettext_ctor(recording.clone());
        let out = capability
            .execute(Some(&json!("#result")), Some(&json!("hits")))
            .await
            .unwrap();
        assert_eq!(out, Some(json!({"hits": "42 hits"})));
    }

    #[tokio::test]
    async fn gettext_requires_a_string_result_key() {
        let capability = gettext_ctor(driver());
        let err = capability
            .execute(Some(&json!("#result")), Some(&json!(7)))
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidParam { .. }));
    }

    #[tokio::test]
    async fn driver_failures_pass_through() {
        use actionbook_driver::DriverError;
        let recording = Arc::new(
            RecordingDriver::new().fail_on_call(0, DriverError::NotFound("#go".to_string())),
        );
        let capability = click_ctor(recording);
        let err = capability
            .execute(Some(&json!("#go")), None)
            .await
            .unwrap_err();
        assert!(err.is_driver_failure());
        assert!(matches!(err, CapabilityError::Driver(_)));
    }
}
