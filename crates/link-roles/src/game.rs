//! Game-server collaborators

use async_trait::async_trait;
use link_core::Result;
use uuid::Uuid;

/// Permission plugin access
///
/// `context` narrows a group grant to a server context; `None` is the
/// global context.
#[async_trait]
pub trait GamePermissions: Send + Sync {
    async fn has_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> Result<bool>;

    async fn add_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> Result<()>;

    async fn remove_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> Result<()>;
}

/// Player display nicknames
#[async_trait]
pub trait GameNicknames: Send + Sync {
    async fn nickname(&self, player_uuid: Uuid) -> Result<Option<String>>;

    /// Set or clear (`None`) a player's nickname
    async fn set_nickname(&self, player_uuid: Uuid, nickname: Option<String>) -> Result<()>;
}
