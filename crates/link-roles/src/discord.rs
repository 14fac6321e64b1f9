//! Discord collaborator
//!
//! The gateway and REST transport live outside this crate. Everything the
//! synchronizables need from Discord goes through [`DiscordApi`].

use async_trait::async_trait;
use link_core::{Permission, Result};
use serde::{Deserialize, Serialize};

/// A guild role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DiscordRole {
    pub id: u64,
    pub guild_id: u64,
    pub name: String,
    /// Position in the role hierarchy, higher is more powerful
    #[serde(default)]
    pub position: u32,
}

/// A user's membership in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GuildMember {
    pub guild_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub roles: Vec<u64>,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl GuildMember {
    pub fn has_role(&self, role_id: u64) -> bool {
        self.roles.contains(&role_id)
    }
}

/// The bot's own membership in a guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelfMember {
    pub guild_id: u64,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    /// Position of the bot's highest role
    #[serde(default)]
    pub top_role_position: u32,
    #[serde(default)]
    pub owner: bool,
}

impl SelfMember {
    /// Whether the bot holds `permission`, directly or through Administrator
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.owner
            || self
                .permissions
                .iter()
                .any(|held| *held == permission || *held == Permission::Administrator)
    }

    /// Whether the role hierarchy lets the bot assign `role`
    pub fn can_interact(&self, role: &DiscordRole) -> bool {
        self.owner || self.top_role_position > role.position
    }
}

/// Discord operations used by the synchronizables
///
/// Lookups return `Ok(None)` when Discord reports the object unknown.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn role_by_id(&self, role_id: u64) -> Result<Option<DiscordRole>>;

    async fn guild_member(&self, guild_id: u64, user_id: u64) -> Result<Option<GuildMember>>;

    /// The bot's own member in `guild_id`
    async fn self_member(&self, guild_id: u64) -> Result<Option<SelfMember>>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> Result<()>;

    /// Set or clear (`None`) a member's nickname
    async fn modify_nickname(&self, guild_id: u64, user_id: u64, nickname: Option<String>) -> Result<()>;
}
