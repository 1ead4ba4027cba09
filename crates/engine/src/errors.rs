//! Error types for action runs

use actionbook_core_types::ActionKind;
use actionbook_registry::CapabilityError;
use actionbook_resolver::ResolveError;
use thiserror::Error;

/// Failures an action run can stop on, in rough state-machine order.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No top-level action with this name
    #[error("action '{name}' is not defined")]
    NotFound { name: String },

    /// The parent exists but holds no such child action
    #[error("action '{parent}' has no child action '{child}'")]
    ChildNotFound { parent: String, child: String },

    /// Declared type does not match the requested kind
    #[error("action '{name}' is declared '{declared}' but was invoked as '{requested}'")]
    KindMismatch {
        name: String,
        declared: String,
        requested: ActionKind,
    },

    /// The definition body does not have the required shape
    #[error("invalid definition for '{name}': {reason}")]
    Schema { name: String, reason: String },

    /// A step names a verb nothing has registered
    #[error("unknown action verb '{verb}' in step '{desc}'")]
    UnknownVerb { verb: String, desc: String },

    /// A selector or param reference did not resolve
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A capability failed while driving the step
    #[error("step '{desc}' ({verb}) failed: {source}")]
    Step {
        desc: String,
        verb: String,
        #[source]
        source: CapabilityError,
    },

    /// The caller-supplied context could not be normalized
    #[error("invalid run context: {reason}")]
    Context { reason: String },
}
