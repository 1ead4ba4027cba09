//! Shared data types for the actionbook workspace
//!
//! Everything the loader, resolver, registry and engine exchange lives here:
//! - Action kinds (`op` / `assert`) and their string forms
//! - Authored step definitions and their normalized executable form
//! - The caller-supplied context mapping threaded through a run
//! - Common aliases for the merged definition table and run results

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Merged view of every definition file, keyed by top-level action name.
///
/// Values stay semi-structured: nested actions, declared types and step lists
/// are all validated at execution time, not load time.
pub type ActionTable = BTreeMap<String, Value>;

/// Mapping-shaped results accumulated over one run. Later steps overwrite
/// earlier values on key collision.
pub type ResultsMap = Map<String, Value>;

/// The two behavior families a definition may declare.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Driving operations: navigate, click, type text.
    Op,
    /// Verification passes that read state back out of the page.
    Assert,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Op => "op",
            Self::Assert => "assert",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("unknown action kind '{0}', expected 'op' or 'assert'")]
pub struct ParseActionKindError(String);

impl FromStr for ActionKind {
    type Err = ParseActionKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "op" => Ok(Self::Op),
            "assert" => Ok(Self::Assert),
            other => Err(ParseActionKindError(other.to_string())),
        }
    }
}

/// Unique identifier for one engine run, used for log correlation.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step as authored in a definition file.
///
/// `op` steps use `action`/`param`; `assert` steps may use the `logical`/
/// `value` aliases instead. Unknown fields are ignored so definition files can
/// carry annotations the engine does not interpret.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Assert-family alias for `action`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<Value>,
    /// Assert-family alias for `param`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Shape problems found while normalizing an authored step.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum StepShapeError {
    #[error("step '{desc}' declares no action verb")]
    MissingVerb { desc: String },
}

/// A step after alias normalization, ready for dispatch.
///
/// Derived fresh for every run; the authored definition is never mutated, so
/// independent runs can share one loaded table.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutableStep {
    pub desc: String,
    pub verb: String,
    pub selector: Option<Value>,
    pub param: Option<Value>,
}

impl ExecutableStep {
    /// Normalizes an authored step for the given kind.
    ///
    /// For `assert` runs the `logical`/`value` aliases take precedence over
    /// `action`/`param` when both are present; steps already written with the
    /// canonical names pass through unchanged. For `op` runs the aliases are
    /// ignored entirely.
    pub fn derive(def: &StepDefinition, kind: ActionKind) -> Result<Self, StepShapeError> {
        let (verb, param) = match kind {
            ActionKind::Op => (def.action.clone(), def.param.clone()),
            ActionKind::Assert => (
                def.logical.clone().or_else(|| def.action.clone()),
                def.value.clone().or_else(|| def.param.clone()),
            ),
        };
        let verb = verb.ok_or_else(|| StepShapeError::MissingVerb {
            desc: def.desc.clone(),
        })?;
        Ok(Self {
            desc: def.desc.clone(),
            verb,
            selector: def.selector.clone(),
            param,
        })
    }
}

/// Caller-supplied run context: string keys mapped to arbitrary values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(flatten)]
    values: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a context from a serialized JSON object. Non-object documents
    /// are rejected.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let values: Map<String, Value> = serde_json::from_str(raw)?;
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Compact JSON rendering, used when an unresolved reference needs to
    /// report what the context actually held.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.values).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Map<String, Value>> for Context {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Context as a caller hands it over: either an in-memory mapping or a raw
/// JSON document that still needs parsing.
#[derive(Clone, Debug)]
pub enum ContextSource {
    Map(Context),
    Json(String),
}

impl ContextSource {
    /// Normalizes to a concrete [`Context`], parsing the JSON form.
    pub fn normalize(self) -> Result<Context, serde_json::Error> {
        match self {
            Self::Map(ctx) => Ok(ctx),
            Self::Json(raw) => Context::from_json_str(&raw),
        }
    }
}

impl Default for ContextSource {
    fn default() -> Self {
        Self::Map(Context::default())
    }
}

impl From<Context> for ContextSource {
    fn from(ctx: Context) -> Self {
        Self::Map(ctx)
    }
}

impl From<Map<String, Value>> for ContextSource {
    fn from(values: Map<String, Value>) -> Self {
        Self::Map(Context::from(values))
    }
}

impl From<&str> for ContextSource {
    fn from(raw: &str) -> Self {
        Self::Json(raw.to_string())
    }
}

impl From<String> for ContextSource {
    fn from(raw: String) -> Self {
        Self::Json(raw)
    }
}

/// Renders a context value for substitution into surrounding text.
///
/// Strings render bare, without surrounding quotes; everything else renders as
/// compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
