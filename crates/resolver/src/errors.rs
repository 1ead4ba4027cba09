//! Error types for reference resolution

use actionbook_core_types::Context;
use thiserror::Error;

/// Resolution failures. Both variants carry the full context rendering so a
/// failing test log shows what was actually available.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A whole-reference path parsed but did not resolve against the context
    #[error("cannot resolve reference '{reference}': {detail} (context: {context})")]
    Unresolvable {
        reference: String,
        detail: String,
        context: String,
    },

    /// An embedded reference names a key the context does not hold
    #[error("context variable '{key}' not found (context: {context})")]
    MissingKey { key: String, context: String },
}

impl ResolveError {
    pub(crate) fn unresolvable(reference: &str, detail: impl Into<String>, ctx: &Context) -> Self {
        Self::Unresolvable {
            reference: reference.to_string(),
            detail: detail.into(),
            context: ctx.to_json_string(),
        }
    }

    pub(crate) fn missing_key(key: &str, ctx: &Context) -> Self {
        Self::MissingKey {
            key: key.to_string(),
            context: ctx.to_json_string(),
        }
    }
}
