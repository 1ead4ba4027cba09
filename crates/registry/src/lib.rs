//! Capability registry for actionbook
//!
//! Maps action verbs (`open`, `click`, `input`, `gettext`, plus anything a
//! caller registers) to constructors that bind a capability to a concrete
//! browser driver. Registration is explicit and happens at startup; lookups
//! afterwards are read-only and safe to share across concurrently running
//! engines.

pub mod api;
pub mod builtins;
pub mod errors;

pub use api::{Capability, CapabilityCtor, CapabilityRegistry};
pub use errors::CapabilityError;
