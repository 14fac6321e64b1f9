//! In-memory world
//!
//! A [`World`] holds a [`WorldState`] snapshot of one Discord side and one
//! game side and implements every collaborator over it. Snapshots are JSON
//! so the CLI can resync offline and write the result back.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use link_core::{Error as CoreError, LinkProvider, Resolved, Result as CoreResult, SyncResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::discord::{DiscordApi, DiscordRole, GuildMember, SelfMember};
use crate::error::{Error, Result};
use crate::game::{GameNicknames, GamePermissions};

/// A group granted to a player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupGrant {
    pub player: Uuid,
    pub group: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// A linked game/Discord account pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
    pub player: Uuid,
    pub user: u64,
}

/// Serializable contents of a [`World`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorldState {
    #[serde(default)]
    pub roles: Vec<DiscordRole>,
    #[serde(default)]
    pub members: Vec<GuildMember>,
    /// The bot's membership per guild
    #[serde(default)]
    pub bots: Vec<SelfMember>,
    #[serde(default)]
    pub groups: Vec<GroupGrant>,
    #[serde(default)]
    pub nicknames: BTreeMap<Uuid, String>,
    #[serde(default)]
    pub links: Vec<AccountLink>,
    /// Whether a game permission plugin is installed
    #[serde(default = "default_true")]
    pub permission_provider: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WorldState {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            members: Vec::new(),
            bots: Vec::new(),
            groups: Vec::new(),
            nicknames: BTreeMap::new(),
            links: Vec::new(),
            permission_provider: true,
        }
    }
}

/// Shared, mutable world implementing every collaborator
#[derive(Debug, Default)]
pub struct World {
    state: Mutex<WorldState>,
    discord_writes: AtomicUsize,
    game_writes: AtomicUsize,
}

impl World {
    pub fn new(state: WorldState) -> Self {
        Self {
            state: Mutex::new(state),
            ..Self::default()
        }
    }

    /// Load a JSON snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(serde_json::from_str(&content)?))
    }

    /// Write the current state as a JSON snapshot
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, content + "\n").map_err(|source| Error::Snapshot {
            path: path.to_path_buf(),
            source,
        })
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> WorldState {
        self.lock().clone()
    }

    /// Mutate the state in place
    pub fn update<R>(&self, change: impl FnOnce(&mut WorldState) -> R) -> R {
        change(&mut self.lock())
    }

    pub fn has_permission_provider(&self) -> bool {
        self.lock().permission_provider
    }

    /// Number of role and nickname changes sent to Discord
    pub fn discord_writes(&self) -> usize {
        self.discord_writes.load(Ordering::SeqCst)
    }

    /// Number of group and nickname changes made on the game side
    pub fn game_writes(&self) -> usize {
        self.game_writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_member<R>(&self, guild_id: u64, user_id: u64, change: impl FnOnce(&mut GuildMember) -> R) -> CoreResult<R> {
        let mut state = self.lock();
        let member = state
            .members
            .iter_mut()
            .find(|member| member.guild_id == guild_id && member.user_id == user_id)
            .ok_or(CoreError::fail(SyncResult::NotAGuildMember))?;
        self.discord_writes.fetch_add(1, Ordering::SeqCst);
        Ok(change(member))
    }
}

#[async_trait]
impl DiscordApi for World {
    async fn role_by_id(&self, role_id: u64) -> CoreResult<Option<DiscordRole>> {
        Ok(self.lock().roles.iter().find(|role| role.id == role_id).cloned())
    }

    async fn guild_member(&self, guild_id: u64, user_id: u64) -> CoreResult<Option<GuildMember>> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|member| member.guild_id == guild_id && member.user_id == user_id)
            .cloned())
    }

    async fn self_member(&self, guild_id: u64) -> CoreResult<Option<SelfMember>> {
        Ok(self.lock().bots.iter().find(|bot| bot.guild_id == guild_id).cloned())
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> CoreResult<()> {
        self.with_member(guild_id, user_id, |member| {
            if !member.roles.contains(&role_id) {
                member.roles.push(role_id);
            }
        })
    }

    async fn remove_role(&self, guild_id: u64, user_id: u64, role_id: u64) -> CoreResult<()> {
        self.with_member(guild_id, user_id, |member| member.roles.retain(|held| *held != role_id))
    }

    async fn modify_nickname(&self, guild_id: u64, user_id: u64, nickname: Option<String>) -> CoreResult<()> {
        self.with_member(guild_id, user_id, |member| member.nickname = nickname)
    }
}

#[async_trait]
impl GamePermissions for World {
    async fn has_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> CoreResult<bool> {
        Ok(self.lock().groups.iter().any(|grant| {
            grant.player == player_uuid && grant.group == group && grant.context.as_deref() == context
        }))
    }

    async fn add_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> CoreResult<()> {
        self.game_writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let grant = GroupGrant {
            player: player_uuid,
            group: group.to_string(),
            context: context.map(str::to_string),
        };
        if !state.groups.contains(&grant) {
            state.groups.push(grant);
        }
        Ok(())
    }

    async fn remove_group(&self, player_uuid: Uuid, group: &str, context: Option<&str>) -> CoreResult<()> {
        self.game_writes.fetch_add(1, Ordering::SeqCst);
        self.lock().groups.retain(|grant| {
            !(grant.player == player_uuid && grant.group == group && grant.context.as_deref() == context)
        });
        Ok(())
    }
}

#[async_trait]
impl GameNicknames for World {
    async fn nickname(&self, player_uuid: Uuid) -> CoreResult<Option<String>> {
        Ok(self.lock().nicknames.get(&player_uuid).cloned())
    }

    async fn set_nickname(&self, player_uuid: Uuid, nickname: Option<String>) -> CoreResult<()> {
        self.game_writes.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        match nickname {
            Some(nickname) => state.nicknames.insert(player_uuid, nickname),
            None => state.nicknames.remove(&player_uuid),
        };
        Ok(())
    }
}

#[async_trait]
impl LinkProvider for World {
    async fn user_id(&self, player_uuid: Uuid) -> CoreResult<Option<u64>> {
        Ok(self
            .lock()
            .links
            .iter()
            .find(|link| link.player == player_uuid)
            .map(|link| link.user))
    }

    async fn player_uuid(&self, user_id: u64) -> CoreResult<Option<Uuid>> {
        Ok(self
            .lock()
            .links
            .iter()
            .find(|link| link.user == user_id)
            .map(|link| link.player))
    }

    async fn linked_accounts(&self) -> CoreResult<Vec<Resolved>> {
        Ok(self
            .lock()
            .links
            .iter()
            .map(|link| Resolved::new(link.player, link.user))
            .collect())
    }
}
