//! Error types for link-config

use std::path::PathBuf;

/// Result type for link-config operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration parsed but is not usable
    #[error("Invalid configuration: {}", .issues.join("; "))]
    Invalid { issues: Vec<String> },

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
