//! Error types for definition loading

use std::path::PathBuf;

use thiserror::Error;

/// Fatal loading failures. Per-file parse problems are deliberately absent:
/// those are logged and the file is skipped.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Two sources declare the same top-level action name
    #[error("duplicate action name '{name}' declared again in {path}")]
    Conflict { name: String, path: PathBuf },

    /// The definitions root itself cannot be read
    #[error("cannot read definition directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
