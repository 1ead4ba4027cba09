//! Restricted path expressions for whole-reference resolution
//!
//! Grammar, applied to the text after the `$` sigil:
//!
//! ```text
//! path    := segment+
//! segment := '.' ident | '[' quoted ']' | '[' digits ']'
//! ident   := (letter | '_') (letter | digit | '_')*
//! quoted  := '\'' non-quote* '\'' | '"' non-quote* '"'
//! ```
//!
//! Ident letters and digits are Unicode alphanumerics, the same word
//! characters the embedded scanner matches, so dotted references to
//! non-ASCII keys stay in path mode.
//!
//! Nothing else: no calls, no arithmetic, no nesting. Input that does not
//! match exactly is rejected, and the caller falls back to embedded
//! substitution instead of evaluating anything.

use std::fmt;

/// One step of a parsed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Mapping key access: `.name`, `['name']` or `["name"]`.
    Key(String),
    /// Sequence index access: `[0]`.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "['{}']", key),
            Segment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Byte offset where parsing stopped making sense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathSyntaxError {
    pub at: usize,
}

/// Parses the text after `$` into path segments.
pub fn parse_path(input: &str) -> Result<Vec<Segment>, PathSyntaxError> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                let start = pos + 1;
                let rest = &input[start..];
                let mut len = 0;
                for ch in rest.chars() {
                    if ch.is_alphanumeric() || ch == '_' {
                        len += ch.len_utf8();
                    } else {
                        break;
                    }
                }
                if len == 0 || rest.starts_with(|c: char| c.is_numeric()) {
                    return Err(PathSyntaxError { at: pos });
                }
                segments.push(Segment::Key(rest[..len].to_string()));
                pos = start + len;
            }
            b'[' => {
                let start = pos + 1;
                if start >= bytes.len() {
                    return Err(PathSyntaxError { at: pos });
                }
                match bytes[start] {
                    quote @ (b'\'' | b'"') => {
                        let mut end = start + 1;
                        while end < bytes.len() && bytes[end] != quote {
                            end += 1;
                        }
                        if end + 1 >= bytes.len() || bytes[end + 1] != b']' {
                            return Err(PathSyntaxError { at: pos });
                        }
                        segments.push(Segment::Key(input[start + 1..end].to_string()));
                        pos = end + 2;
                    }
                    b'0'..=b'9' => {
                        let mut end = start;
                        while end < bytes.len() && bytes[end].is_ascii_digit() {
                            end += 1;
                        }
                        if end >= bytes.len() || bytes[end] != b']' {
                            return Err(PathSyntaxError { at: pos });
                        }
                        let index: usize = input[start..end]
                            .parse()
                            .map_err(|_| PathSyntaxError { at: pos })?;
                        segments.push(Segment::Index(index));
                        pos = end + 1;
                    }
                    _ => return Err(PathSyntaxError { at: pos }),
                }
            }
            _ => return Err(PathSyntaxError { at: pos }),
        }
    }

    if segments.is_empty() {
        return Err(PathSyntaxError { at: 0 });
    }
    Ok(segments)
}
