//! Action run orchestration for actionbook
//!
//! The [`Engine`] ties the other crates together: it looks a dotted action
//! name up in the loaded table, validates the declared kind, derives
//! per-invocation executable steps, resolves context references, dispatches
//! each verb through the capability registry and aggregates mapping-shaped
//! results. The first failing step ends the run after a best-effort failure
//! artifact capture.

pub mod engine;
pub mod errors;
pub mod report;

pub use engine::Engine;
pub use errors::EngineError;
pub use report::{NoopReporter, ReportError, Reporter};
