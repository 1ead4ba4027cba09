//! Embedded reference substitution
//!
//! Scans a string for `$.name` and `$['name']` occurrences and splices the
//! stringified context values in. All referenced keys are checked before any
//! replacement happens, so a half-substituted string never escapes.

use actionbook_core_types::{display_value, Context};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::errors::ResolveError;

static EMBEDDED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\.(\w+)|\$\['(.*?)'\]").expect("embedded reference pattern"));

fn captured_key<'t>(caps: &'t Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str())
        .unwrap_or_default()
}

/// Substitutes every embedded reference in `text`. Strings without any
/// reference pass through unchanged. The scan runs over the original text
/// once; substituted values are never re-scanned.
pub(crate) fn substitute(ctx: &Context, text: &str) -> Result<Value, ResolveError> {
    if !EMBEDDED_RE.is_match(text) {
        return Ok(Value::String(text.to_string()));
    }

    for caps in EMBEDDED_RE.captures_iter(text) {
        let key = captured_key(&caps);
        if !ctx.contains_key(key) {
            return Err(ResolveError::missing_key(key, ctx));
        }
    }

    let replaced = EMBEDDED_RE.replace_all(text, |caps: &Captures<'_>| {
        ctx.get(captured_key(caps))
            .map(display_value)
            .unwrap_or_default()
    });
    Ok(Value::String(replaced.into_owned()))
}
