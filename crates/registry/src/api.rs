//! Capability contract and the verb registry

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use actionbook_driver::BrowserDriver;

use crate::builtins;
use crate::errors::CapabilityError;

/// One executable verb.
///
/// Implementations receive the step's already-resolved selector and param
/// values; reference resolution happened upstream. A mapping return value is
/// merged into the run results, anything else contributes nothing.
#[async_trait]
pub trait Capability: Send + Sync {
    async fn execute(
        &self,
        locator: Option<&Value>,
        data: Option<&Value>,
    ) -> Result<Option<Value>, CapabilityError>;
}

/// Builds a capability bound to a concrete driver.
pub type CapabilityCtor = Arc<dyn Fn(Arc<dyn BrowserDriver>) -> Arc<dyn Capability> + Send + Sync>;

/// Verb-indexed table of capability constructors.
pub struct CapabilityRegistry {
    entries: DashMap<String, CapabilityCtor>,
}

impl CapabilityRegistry {
    /// Empty registry with no verbs at all.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in verbs:
    /// `open`, `click`, `input`, `gettext`.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtins::register_all(&registry);
        registry
    }

    /// Registers `ctor` under `verb`. A later registration for the same verb
    /// replaces the earlier one.
    pub fn register<F>(&self, verb: impl Into<String>, ctor: F)
    where
        F: Fn(Arc<dyn BrowserDriver>) -> Arc<dyn Capability> + Send + Sync + 'static,
    {
        let verb = verb.into();
        if self.entries.contains_key(&verb) {
            debug!(verb = %verb, "replacing existing capability registration");
        }
        self.entries.insert(verb, Arc::new(ctor));
    }

    /// Looks up the constructor for `verb`.
    pub fn get(&self, verb: &str) -> Option<CapabilityCtor> {
        self.entries.get(verb).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, verb: &str) -> bool {
        self.entries.contains_key(verb)
    }

    /// Registered verbs, sorted for stable listing.
    pub fn verbs(&self) -> Vec<String> {
        let mut verbs: Vec<String> = self
            .entries
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        verbs.sort();
        verbs
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actionbook_driver::RecordingDriver;

    struct MarkerCapability;

    #[async_trait]
    impl Capability for MarkerCapability {
        async fn execute(
            &self,
            _locator: Option<&Value>,
            _data: Option<&Value>,
        ) -> Result<Option<Value>, CapabilityError> {
            Ok(Some(Value::String("marker".to_string())))
        }
    }

    fn marker_ctor(_driver: Arc<dyn BrowserDriver>) -> Arc<dyn Capability> {
        Arc::new(MarkerCapability)
    }

    #[test]
    fn builtins_cover_the_four_verbs() {
        let registry = CapabilityRegistry::with_builtins();
        assert_eq!(registry.verbs(), vec!["click", "gettext", "input", "open"]);
    }

    #[test]
    fn unknown_verb_lookup_is_none() {
        let registry = CapabilityRegistry::with_builtins();
        assert!(registry.get("scroll").is_none());
        assert!(!registry.contains("scroll"));
    }

    #[tokio::test]
    async fn custom_verbs_can_be_registered() {
        let registry = CapabilityRegistry::with_builtins();
        registry.register("marker", marker_ctor);

        let driver: Arc<dyn BrowserDriver> = Arc::new(RecordingDriver::new());
        let ctor = registry.get("marker").expect("registered verb");
        let capability = ctor(driver);
        let out = capability.execute(None, None).await.unwrap();
        assert_eq!(out, Some(Value::String("marker".to_string())));
    }

    #[tokio::test]
    async fn re_registration_replaces_the_verb() {
        let registry = CapabilityRegistry::with_builtins();
        registry.register("open", marker_ctor);

        let driver: Arc<dyn BrowserDriver> = Arc::new(RecordingDriver::new());
        let capability = registry.get("open").expect("open stays registered")(driver);
        let out = capability.execute(None, None).await.unwrap();
        assert_eq!(out, Some(Value::String("marker".to_string())));
    }
}
