//! Error types for link-roles

use std::path::PathBuf;

/// Result type for link-roles operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside of a sync, e.g. loading a world snapshot
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A world snapshot could not be read or written
    #[error("World snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the sync engine
    #[error(transparent)]
    Core(#[from] link_core::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
