//! Nickname sync: game display nickname <-> guild member nickname

use std::sync::Arc;

use async_trait::async_trait;
use link_core::{Error, Permission, Result, SyncConfig, SyncResult, SyncSettings, Synchronizable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discord::DiscordApi;
use crate::game::GameNicknames;

/// Nickname sync for one guild
///
/// Has no object ids, so it is only reached through resync-all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NicknameSyncConfig {
    pub guild: u64,
    #[serde(flatten)]
    pub settings: SyncSettings,
}

impl NicknameSyncConfig {
    pub fn new(guild: u64, settings: SyncSettings) -> Self {
        Self { guild, settings }
    }
}

impl SyncConfig for NicknameSyncConfig {
    type GameId = ();
    type DiscordId = ();

    fn game_id(&self) -> Option<()> {
        None
    }

    fn discord_id(&self) -> Option<()> {
        None
    }

    fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn is_set(&self) -> bool {
        self.guild != 0
    }

    fn is_same_as(&self, other: &Self) -> bool {
        self.guild == other.guild
    }

    fn describe(&self) -> String {
        format!("guild {}", self.guild)
    }
}

/// Blank nicknames count as no nickname
fn non_blank(nickname: Option<String>) -> Option<String> {
    nickname.filter(|nickname| !nickname.trim().is_empty())
}

pub struct NicknameSyncModule {
    discord: Arc<dyn DiscordApi>,
    nicknames: Arc<dyn GameNicknames>,
}

impl NicknameSyncModule {
    pub fn new(discord: Arc<dyn DiscordApi>, nicknames: Arc<dyn GameNicknames>) -> Self {
        Self { discord, nicknames }
    }
}

#[async_trait]
impl Synchronizable for NicknameSyncModule {
    type Config = NicknameSyncConfig;
    type State = String;

    fn name(&self) -> &str {
        "Nickname sync"
    }

    fn log_file_name(&self) -> &str {
        "nicknamesync"
    }

    fn game_term(&self) -> &str {
        "nickname"
    }

    fn discord_term(&self) -> &str {
        "Discord nickname"
    }

    async fn get_game(&self, _config: &NicknameSyncConfig, player_uuid: Uuid) -> Result<Option<String>> {
        Ok(non_blank(self.nicknames.nickname(player_uuid).await?))
    }

    async fn get_discord(&self, config: &NicknameSyncConfig, user_id: u64) -> Result<Option<String>> {
        let member = self
            .discord
            .guild_member(config.guild, user_id)
            .await?
            .ok_or(Error::fail(SyncResult::NotAGuildMember))?;
        Ok(non_blank(member.nickname))
    }

    async fn apply_game(
        &self,
        _config: &NicknameSyncConfig,
        player_uuid: Uuid,
        new_state: Option<String>,
    ) -> Result<SyncResult> {
        let new_state = non_blank(new_state);
        let result = if new_state.is_some() {
            SyncResult::AddGame
        } else {
            SyncResult::RemoveGame
        };
        self.nicknames.set_nickname(player_uuid, new_state).await?;
        Ok(result)
    }

    async fn apply_discord(
        &self,
        config: &NicknameSyncConfig,
        user_id: u64,
        new_state: Option<String>,
    ) -> Result<SyncResult> {
        let bot = self
            .discord
            .self_member(config.guild)
            .await?
            .ok_or_else(|| Error::discord(format!("bot is not a member of guild {}", config.guild)))?;
        if !bot.has_permission(Permission::ManageNicknames) {
            return Err(Error::fail(SyncResult::MissingPermission(Permission::ManageNicknames)));
        }
        if self.discord.guild_member(config.guild, user_id).await?.is_none() {
            return Err(Error::fail(SyncResult::NotAGuildMember));
        }

        let new_state = non_blank(new_state);
        let result = if new_state.is_some() {
            SyncResult::AddDiscord
        } else {
            SyncResult::RemoveDiscord
        };
        self.discord.modify_nickname(config.guild, user_id, new_state).await?;
        Ok(result)
    }

    /// Blank nicknames count as no nickname
    fn does_state_match(&self, one: Option<&String>, two: Option<&String>) -> Option<SyncResult> {
        fn normalize(state: Option<&String>) -> Option<&str> {
            state.map(|s| s.trim()).filter(|s| !s.is_empty())
        }
        (normalize(one) == normalize(two)).then_some(SyncResult::AlreadyInSync)
    }
}
