//! Account identity resolution
//!
//! A [`Someone`] names a subject by game UUID, Discord user id, or both.
//! Resolving it through a [`LinkProvider`] yields a [`Resolved`] subject,
//! which is the only form the convergence engine accepts.

use std::fmt;

use uuid::Uuid;

use crate::link::LinkProvider;
use crate::{Error, Result};

/// A subject known by at least one of its identities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Someone {
    /// Only the game-side player UUID is known
    Player(Uuid),
    /// Only the Discord user id is known
    User(u64),
    /// Both identities are known
    Resolved(Resolved),
}

/// A subject with both a game identity and a Discord identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolved {
    player_uuid: Uuid,
    user_id: u64,
}

impl Resolved {
    pub fn new(player_uuid: Uuid, user_id: u64) -> Self {
        Self {
            player_uuid,
            user_id,
        }
    }

    pub fn player_uuid(&self) -> Uuid {
        self.player_uuid
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }
}

impl Someone {
    /// A subject known by player UUID
    pub fn player(player_uuid: Uuid) -> Self {
        Someone::Player(player_uuid)
    }

    /// A subject known by Discord user id
    pub fn user(user_id: u64) -> Self {
        Someone::User(user_id)
    }

    /// A subject known by both identities
    pub fn both(player_uuid: Uuid, user_id: u64) -> Resolved {
        Resolved::new(player_uuid, user_id)
    }

    /// Build a subject from optional identities
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoIdentity`] when neither identity is given.
    pub fn from_parts(player_uuid: Option<Uuid>, user_id: Option<u64>) -> Result<Self> {
        match (player_uuid, user_id) {
            (Some(player_uuid), Some(user_id)) => Ok(Someone::Resolved(Resolved::new(player_uuid, user_id))),
            (Some(player_uuid), None) => Ok(Someone::Player(player_uuid)),
            (None, Some(user_id)) => Ok(Someone::User(user_id)),
            (None, None) => Err(Error::NoIdentity),
        }
    }

    pub fn player_uuid(&self) -> Option<Uuid> {
        match self {
            Someone::Player(uuid) => Some(*uuid),
            Someone::User(_) => None,
            Someone::Resolved(resolved) => Some(resolved.player_uuid),
        }
    }

    pub fn user_id(&self) -> Option<u64> {
        match self {
            Someone::Player(_) => None,
            Someone::User(id) => Some(*id),
            Someone::Resolved(resolved) => Some(resolved.user_id),
        }
    }

    /// Resolve both identities through the link provider
    ///
    /// Completes without a lookup when both identities are already known.
    /// Returns `Ok(None)` when no link exists. Never mutates link state.
    pub async fn with_linked_accounts(&self, links: &dyn LinkProvider) -> Result<Option<Resolved>> {
        match *self {
            Someone::Resolved(resolved) => Ok(Some(resolved)),
            Someone::Player(player_uuid) => Ok(links
                .user_id(player_uuid)
                .await?
                .map(|user_id| Resolved::new(player_uuid, user_id))),
            Someone::User(user_id) => Ok(links
                .player_uuid(user_id)
                .await?
                .map(|player_uuid| Resolved::new(player_uuid, user_id))),
        }
    }

    /// Look up the Discord user id, querying the link provider if needed
    pub async fn with_user_id(&self, links: &dyn LinkProvider) -> Result<Option<u64>> {
        match *self {
            Someone::Player(player_uuid) => links.user_id(player_uuid).await,
            _ => Ok(self.user_id()),
        }
    }

    /// Look up the player UUID, querying the link provider if needed
    pub async fn with_player_uuid(&self, links: &dyn LinkProvider) -> Result<Option<Uuid>> {
        match *self {
            Someone::User(user_id) => links.player_uuid(user_id).await,
            _ => Ok(self.player_uuid()),
        }
    }
}

impl From<Resolved> for Someone {
    fn from(resolved: Resolved) -> Self {
        Someone::Resolved(resolved)
    }
}

impl fmt::Display for Someone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Someone::Player(uuid) => write!(f, "player {uuid}"),
            Someone::User(id) => write!(f, "user {id}"),
            Someone::Resolved(resolved) => resolved.fmt(f),
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {} (user {})", self.player_uuid, self.user_id)
    }
}
