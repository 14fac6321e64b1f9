//! Error types for link-core

use crate::result::SyncResult;

/// Result type for link-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A sync failed with a typed, reportable reason
    ///
    /// The convergence engine and the summary unwrap this variant into its
    /// [`SyncResult`] instead of treating it as an unexpected failure.
    #[error("Sync failed: {result}")]
    SyncFail { result: SyncResult },

    /// A subject was described without any identity
    #[error("A subject needs a player UUID, a Discord user id, or both")]
    NoIdentity,

    /// The account link provider failed
    #[error("Link lookup failed: {message}")]
    Link { message: String },

    /// The game-side collaborator failed
    #[error("Game backend error: {message}")]
    Game { message: String },

    /// The Discord-side collaborator failed
    #[error("Discord backend error: {message}")]
    Discord { message: String },

    /// A synchronizable configuration is invalid
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a typed sync failure carrying `result`
    pub fn fail(result: SyncResult) -> Self {
        Self::SyncFail { result }
    }

    /// Create a link provider error
    pub fn link(message: impl Into<String>) -> Self {
        Self::Link {
            message: message.into(),
        }
    }

    /// Create a game backend error
    pub fn game(message: impl Into<String>) -> Self {
        Self::Game {
            message: message.into(),
        }
    }

    /// Create a Discord backend error
    pub fn discord(message: impl Into<String>) -> Self {
        Self::Discord {
            message: message.into(),
        }
    }

    /// The typed reason, if this is a [`Error::SyncFail`]
    pub fn sync_result(&self) -> Option<SyncResult> {
        match self {
            Self::SyncFail { result } => Some(*result),
            _ => None,
        }
    }
}
