//! Browser driving contract for actionbook
//!
//! Capabilities reach a real browser only through the [`BrowserDriver`] trait
//! defined here: navigation, clicking, typing, reading text back out, plus a
//! best-effort failure-artifact capture. The crate also ships two
//! implementations that need no browser at all: [`NoopDriver`] for dry runs
//! and [`RecordingDriver`] for tests that assert on driving side effects.

pub mod api;
pub mod errors;
pub mod locator;
pub mod recording;
pub mod types;

pub use api::*;
pub use errors::*;
pub use locator::*;
pub use recording::*;
pub use types::*;
