//! Context reference resolution for actionbook
//!
//! Step fields may reference the caller's context with a `$` sigil. Two modes
//! exist:
//! - **Whole reference**: the entire field is one path (`$.user.name`,
//!   `$['key'][0]`) and resolves to the typed context value.
//! - **Embedded substitution**: `$.name` / `$['name']` occurrences inside a
//!   longer string are each replaced by the stringified value.
//!
//! A `$`-prefixed field that is not a well-formed path falls back to the
//! embedded scan; it is never evaluated as anything else. Resolution failures
//! report the reference and the full context.

pub mod errors;
pub mod path;
mod subst;

use actionbook_core_types::Context;
use serde_json::Value;
use tracing::debug;

pub use errors::ResolveError;
pub use path::{parse_path, PathSyntaxError, Segment};

/// Resolves one step field against the context.
///
/// Non-strings and empty strings pass through unchanged. See the module docs
/// for the two resolution modes.
pub fn resolve(ctx: &Context, reference: &Value) -> Result<Value, ResolveError> {
    let Some(text) = reference.as_str() else {
        return Ok(reference.clone());
    };
    if text.is_empty() {
        return Ok(reference.clone());
    }

    if let Some(path_text) = text.strip_prefix('$') {
        match path::parse_path(path_text) {
            Ok(segments) => return resolve_path(ctx, text, &segments),
            Err(err) => {
                debug!(
                    reference = text,
                    at = err.at,
                    "reference is not a bare path, scanning for embedded references"
                );
            }
        }
    }

    subst::substitute(ctx, text)
}

fn resolve_path(ctx: &Context, reference: &str, segments: &[Segment]) -> Result<Value, ResolveError> {
    let (first, rest) = match segments.split_first() {
        Some(parts) => parts,
        None => return Err(ResolveError::unresolvable(reference, "empty path", ctx)),
    };

    let mut current = match first {
        Segment::Key(key) => ctx.get(key).ok_or_else(|| {
            ResolveError::unresolvable(reference, format!("context has no key '{key}'"), ctx)
        })?,
        Segment::Index(_) => {
            return Err(ResolveError::unresolvable(
                reference,
                "context root is a mapping, not a sequence",
                ctx,
            ))
        }
    };

    for segment in rest {
        current = match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key).ok_or_else(|| {
                ResolveError::unresolvable(reference, format!("key '{key}' not found"), ctx)
            })?,
            (Segment::Index(index), Value::Array(items)) => {
                items.get(*index).ok_or_else(|| {
                    ResolveError::unresolvable(
                        reference,
                        format!("index {index} out of bounds (length {})", items.len()),
                        ctx,
                    )
                })?
            }
            (segment, other) => {
                return Err(ResolveError::unresolvable(
                    reference,
                    format!("cannot apply {segment} to {}", value_kind(other)),
                    ctx,
                ))
            }
        };
    }

    Ok(current.clone())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Context {
        Context::from_iter([
            ("a".to_string(), json!("1")),
            ("n".to_string(), json!(5)),
            ("user".to_string(), json!({"name": "Ada", "tags": ["x", "y"]})),
            ("key with space".to_string(), json!("spaced")),
        ])
    }

    #[test]
    fn whole_reference_returns_typed_values() {
        assert_eq!(resolve(&ctx(), &json!("$.a")).unwrap(), json!("1"));
        assert_eq!(resolve(&ctx(), &json!("$.n")).unwrap(), json!(5));
        assert_eq!(
            resolve(&ctx(), &json!("$.user")).unwrap(),
            json!({"name": "Ada", "tags": ["x", "y"]})
        );
    }

    #[test]
    fn whole_reference_chains_through_mappings_and_sequences() {
        assert_eq!(resolve(&ctx(), &json!("$.user.name")).unwrap(), json!("Ada"));
        assert_eq!(
            resolve(&ctx(), &json!("$.user.tags[1]")).unwrap(),
            json!("y")
        );
        assert_eq!(
            resolve(&ctx(), &json!("$['key with space']")).unwrap(),
            json!("spaced")
        );
    }

    #[test]
    fn unicode_keys_resolve_in_path_mode() {
        let ctx = Context::from_iter([("café".to_string(), json!(3))]);
        // Typed value, not the stringified "3" an embedded scan would splice.
        assert_eq!(resolve(&ctx, &json!("$.café")).unwrap(), json!(3));
        assert_eq!(resolve(&ctx, &json!("$['café']")).unwrap(), json!(3));
    }

    #[test]
    fn missing_key_reports_reference_and_context() {
        let err = resolve(&ctx(), &json!("$.absent")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("$.absent"));
        assert!(message.contains("\"a\":\"1\""));
    }

    #[test]
    fn deep_failures_name_the_failing_segment() {
        let err = resolve(&ctx(), &json!("$.user.age")).unwrap_err();
        assert!(err.to_string().contains("key 'age' not found"));

        let err = resolve(&ctx(), &json!("$.user.tags[9]")).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));

        let err = resolve(&ctx(), &json!("$.a[0]")).unwrap_err();
        assert!(err.to_string().contains("cannot apply"));
    }

    #[test]
    fn embedded_references_build_strings() {
        assert_eq!(
            resolve(&ctx(), &json!("value=$.a, n=$.n")).unwrap(),
            json!("value=1, n=5")
        );
        assert_eq!(
            resolve(&ctx(), &json!("hi $['a']")).unwrap(),
            json!("hi 1")
        );
    }

    #[test]
    fn embedded_mode_applies_to_unprefixed_strings_too() {
        assert_eq!(
            resolve(&ctx(), &json!("count is $.n today")).unwrap(),
            json!("count is 5 today")
        );
        let err = resolve(&ctx(), &json!("count is $.missing")).unwrap_err();
        assert!(matches!(err, ResolveError::MissingKey { .. }));
    }

    #[test]
    fn malformed_paths_fall_through_to_substitution() {
        // "$.a-suffix" is not a valid bare path, but it contains "$.a".
        assert_eq!(
            resolve(&ctx(), &json!("$.a-suffix")).unwrap(),
            json!("1-suffix")
        );
        // No embedded matches either: passes through untouched.
        assert_eq!(
            resolve(&ctx(), &json!("$notapath")).unwrap(),
            json!("$notapath")
        );
    }

    #[test]
    fn non_strings_and_empties_pass_through() {
        assert_eq!(resolve(&ctx(), &json!(7)).unwrap(), json!(7));
        assert_eq!(resolve(&ctx(), &json!(null)).unwrap(), json!(null));
        assert_eq!(resolve(&ctx(), &json!("")).unwrap(), json!(""));
        assert_eq!(
            resolve(&ctx(), &json!(["$.a"])).unwrap(),
            json!(["$.a"])
        );
    }

    #[test]
    fn empty_context_fails_any_reference() {
        let empty = Context::new();
        assert!(resolve(&empty, &json!("$.a")).is_err());
        assert!(resolve(&empty, &json!("see $.a")).is_err());
    }
}
