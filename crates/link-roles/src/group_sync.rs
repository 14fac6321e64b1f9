//! Group sync: game permission group <-> Discord role

use std::sync::Arc;

use async_trait::async_trait;
use link_core::{Error, Result, SyncConfig, SyncResult, SyncSettings, Synchronizable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discord::DiscordApi;
use crate::game::GamePermissions;
use crate::roles;

/// One configured group/role pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupSyncConfig {
    pub group: String,
    pub role: u64,
    /// Permission context the group is granted in, `None` for global
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_context: Option<String>,
    #[serde(flatten)]
    pub settings: SyncSettings,
}

impl GroupSyncConfig {
    pub fn new(group: impl Into<String>, role: u64) -> Self {
        Self {
            group: group.into(),
            role,
            server_context: None,
            settings: SyncSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.server_context = Some(context.into());
        self
    }
}

impl SyncConfig for GroupSyncConfig {
    type GameId = String;
    type DiscordId = u64;

    fn game_id(&self) -> Option<String> {
        Some(self.group.clone())
    }

    fn discord_id(&self) -> Option<u64> {
        Some(self.role)
    }

    fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn is_set(&self) -> bool {
        !self.group.is_empty() && self.role != 0
    }

    fn is_same_as(&self, other: &Self) -> bool {
        self.group == other.group && self.role == other.role
    }

    fn describe(&self) -> String {
        match &self.server_context {
            Some(context) => format!("{}[{}]:{}", self.group, context, self.role),
            None => format!("{}:{}", self.group, self.role),
        }
    }
}

/// Keeps group membership and role membership in agreement
///
/// State is `Some(true)` while the subject is in the group (holds the
/// role) and `None` otherwise.
pub struct GroupSyncModule {
    discord: Arc<dyn DiscordApi>,
    permissions: Option<Arc<dyn GamePermissions>>,
}

impl GroupSyncModule {
    /// `permissions` is `None` when no permission plugin is installed
    pub fn new(discord: Arc<dyn DiscordApi>, permissions: Option<Arc<dyn GamePermissions>>) -> Self {
        Self { discord, permissions }
    }

    fn permissions(&self) -> Result<&dyn GamePermissions> {
        self.permissions
            .as_deref()
            .ok_or(Error::fail(SyncResult::NoPermissionProvider))
    }
}

#[async_trait]
impl Synchronizable for GroupSyncModule {
    type Config = GroupSyncConfig;
    type State = bool;

    fn name(&self) -> &str {
        "Group sync"
    }

    fn log_file_name(&self) -> &str {
        "groupsync"
    }

    fn game_term(&self) -> &str {
        "group"
    }

    fn discord_term(&self) -> &str {
        "role"
    }

    async fn get_game(&self, config: &GroupSyncConfig, player_uuid: Uuid) -> Result<Option<bool>> {
        let has = self
            .permissions()?
            .has_group(player_uuid, &config.group, config.server_context.as_deref())
            .await?;
        Ok(has.then_some(true))
    }

    async fn get_discord(&self, config: &GroupSyncConfig, user_id: u64) -> Result<Option<bool>> {
        let has = roles::has_role(self.discord.as_ref(), user_id, config.role).await?;
        Ok(has.then_some(true))
    }

    async fn apply_game(
        &self,
        config: &GroupSyncConfig,
        player_uuid: Uuid,
        new_state: Option<bool>,
    ) -> Result<SyncResult> {
        let permissions = self.permissions()?;
        let context = config.server_context.as_deref();
        if new_state.is_some() {
            permissions.add_group(player_uuid, &config.group, context).await?;
            Ok(SyncResult::AddGame)
        } else {
            permissions.remove_group(player_uuid, &config.group, context).await?;
            Ok(SyncResult::RemoveGame)
        }
    }

    async fn apply_discord(&self, config: &GroupSyncConfig, user_id: u64, new_state: Option<bool>) -> Result<SyncResult> {
        roles::do_role_change(self.discord.as_ref(), user_id, config.role, new_state.is_some()).await
    }
}
