//! Selector strategy inference
//!
//! Selectors in definition files are bare strings; the lookup strategy is
//! inferred from their shape: `//` or `(//` prefixes mean XPath, `#` and `.`
//! prefixes mean CSS, an attribute-predicate shape like `input[@name='q']`
//! means XPath, a purely alphanumeric token is an element id, and anything
//! else falls back to CSS.

use std::fmt;

/// A selector paired with its inferred lookup strategy.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Locator {
    XPath(String),
    Css(String),
    Id(String),
}

impl Locator {
    /// Infers the lookup strategy from a raw selector string.
    ///
    /// Never fails: unclassifiable input becomes a CSS selector and the
    /// driver reports lookup failures at call time.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("//") || raw.starts_with("(//") {
            Self::XPath(raw.to_string())
        } else if raw.starts_with('#') || raw.starts_with('.') {
            Self::Css(raw.to_string())
        } else if raw.contains('=') && raw.contains('[') && raw.contains(']') {
            Self::XPath(raw.to_string())
        } else if !raw.is_empty() && raw.chars().all(|c| c.is_alphanumeric()) {
            Self::Id(raw.to_string())
        } else {
            Self::Css(raw.to_string())
        }
    }

    /// The raw selector expression without the strategy tag.
    pub fn expression(&self) -> &str {
        match self {
            Self::XPath(s) | Self::Css(s) | Self::Id(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XPath(s) => write!(f, "xpath:{}", s),
            Self::Css(s) => write!(f, "css:{}", s),
            Self::Id(s) => write!(f, "id:{}", s),
        }
    }
}
