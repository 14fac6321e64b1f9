//! Error types for link-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from link-config
    #[error(transparent)]
    Config(#[from] link_config::Error),

    /// Error from link-roles
    #[error(transparent)]
    Roles(#[from] link_roles::Error),

    /// Error from link-core
    #[error(transparent)]
    Core(#[from] link_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
