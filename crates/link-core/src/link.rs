//! Account link provider
//!
//! The link provider answers which Discord account belongs to which player.
//! Linking itself (codes, OAuth, storage) lives outside this crate.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::someone::Resolved;

/// Lookup of linked game/Discord accounts
#[async_trait]
pub trait LinkProvider: Send + Sync {
    /// The Discord user linked to `player_uuid`, if any
    async fn user_id(&self, player_uuid: Uuid) -> Result<Option<u64>>;

    /// The player linked to `user_id`, if any
    async fn player_uuid(&self, user_id: u64) -> Result<Option<Uuid>>;

    /// Every linked account pair
    async fn linked_accounts(&self) -> Result<Vec<Resolved>>;
}

/// In-memory link table
///
/// Used for links declared in configuration and in tests.
#[derive(Debug, Default)]
pub struct StaticLinks {
    inner: RwLock<LinkTable>,
}

#[derive(Debug, Default)]
struct LinkTable {
    by_player: BTreeMap<Uuid, u64>,
    by_user: HashMap<u64, Uuid>,
}

impl StaticLinks {
    /// Create a table from `(player, user)` pairs
    pub fn new(links: impl IntoIterator<Item = (Uuid, u64)>) -> Self {
        let table = Self::default();
        for (player_uuid, user_id) in links {
            table.link(player_uuid, user_id);
        }
        table
    }

    /// Link two accounts, replacing any previous link of either side
    pub fn link(&self, player_uuid: Uuid, user_id: u64) {
        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(old_user) = table.by_player.insert(player_uuid, user_id) {
            table.by_user.remove(&old_user);
        }
        if let Some(old_player) = table.by_user.insert(user_id, player_uuid)
            && old_player != player_uuid
        {
            table.by_player.remove(&old_player);
        }
    }

    /// Remove the link of `player_uuid`
    pub fn unlink(&self, player_uuid: Uuid) -> Option<u64> {
        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let user_id = table.by_player.remove(&player_uuid)?;
        table.by_user.remove(&user_id);
        Some(user_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).by_player.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LinkProvider for StaticLinks {
    async fn user_id(&self, player_uuid: Uuid) -> Result<Option<u64>> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.by_player.get(&player_uuid).copied())
    }

    async fn player_uuid(&self, user_id: u64) -> Result<Option<Uuid>> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table.by_user.get(&user_id).copied())
    }

    async fn linked_accounts(&self) -> Result<Vec<Resolved>> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(table
            .by_player
            .iter()
            .map(|(player_uuid, user_id)| Resolved::new(*player_uuid, *user_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relinking_replaces_both_sides() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let links = StaticLinks::new([(first, 1)]);

        links.link(second, 1);

        assert_eq!(links.user_id(first).await.unwrap(), None);
        assert_eq!(links.player_uuid(1).await.unwrap(), Some(second));
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn unlink_removes_pair() {
        let player = Uuid::new_v4();
        let links = StaticLinks::new([(player, 9)]);

        assert_eq!(links.unlink(player), Some(9));
        assert!(links.is_empty());
        assert!(links.linked_accounts().await.unwrap().is_empty());
    }
}
