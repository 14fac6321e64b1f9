//! In-memory synchronizable

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use link_core::{Error, Result, SyncResult, Synchronizable};
use uuid::Uuid;

use crate::fixtures::PairConfig;

/// String state kept in maps, with write counters and injectable failures
#[derive(Debug, Default)]
pub struct MemoryModule {
    game: Mutex<HashMap<(Uuid, String), String>>,
    discord: Mutex<HashMap<(u64, u64), String>>,
    game_writes: AtomicUsize,
    discord_writes: AtomicUsize,
    discord_failure: Mutex<Option<Failure>>,
}

#[derive(Debug, Clone)]
enum Failure {
    Typed(SyncResult),
    Generic(String),
}

impl MemoryModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_game(&self, player: Uuid, group: &str, state: Option<&str>) {
        let mut game = self.game.lock().unwrap();
        match state {
            Some(state) => game.insert((player, group.to_string()), state.to_string()),
            None => game.remove(&(player, group.to_string())),
        };
    }

    pub fn game(&self, player: Uuid, group: &str) -> Option<String> {
        self.game.lock().unwrap().get(&(player, group.to_string())).cloned()
    }

    pub fn set_discord(&self, user: u64, role: u64, state: Option<&str>) {
        let mut discord = self.discord.lock().unwrap();
        match state {
            Some(state) => discord.insert((user, role), state.to_string()),
            None => discord.remove(&(user, role)),
        };
    }

    pub fn discord(&self, user: u64, role: u64) -> Option<String> {
        self.discord.lock().unwrap().get(&(user, role)).cloned()
    }

    /// Number of game-side writes performed
    pub fn game_writes(&self) -> usize {
        self.game_writes.load(Ordering::SeqCst)
    }

    /// Number of Discord-side writes performed
    pub fn discord_writes(&self) -> usize {
        self.discord_writes.load(Ordering::SeqCst)
    }

    /// Make every Discord read fail with a typed reason
    pub fn fail_discord_with(&self, result: SyncResult) {
        *self.discord_failure.lock().unwrap() = Some(Failure::Typed(result));
    }

    /// Make every Discord read fail unexpectedly
    pub fn fail_discord_generic(&self, message: &str) {
        *self.discord_failure.lock().unwrap() = Some(Failure::Generic(message.to_string()));
    }

    pub fn clear_failures(&self) {
        *self.discord_failure.lock().unwrap() = None;
    }
}

#[async_trait]
impl Synchronizable for MemoryModule {
    type Config = PairConfig;
    type State = String;

    fn name(&self) -> &str {
        "Memory sync"
    }

    fn log_file_name(&self) -> &str {
        "memorysync"
    }

    fn game_term(&self) -> &str {
        "group"
    }

    fn discord_term(&self) -> &str {
        "role"
    }

    async fn get_game(&self, config: &PairConfig, player_uuid: Uuid) -> Result<Option<String>> {
        Ok(self.game(player_uuid, &config.game_key()))
    }

    async fn get_discord(&self, config: &PairConfig, user_id: u64) -> Result<Option<String>> {
        let failure = self.discord_failure.lock().unwrap().clone();
        match failure {
            Some(Failure::Typed(result)) => Err(Error::fail(result)),
            Some(Failure::Generic(message)) => Err(Error::discord(message)),
            None => Ok(self.discord(user_id, config.discord_key())),
        }
    }

    async fn apply_game(
        &self,
        config: &PairConfig,
        player_uuid: Uuid,
        new_state: Option<String>,
    ) -> Result<SyncResult> {
        self.game_writes.fetch_add(1, Ordering::SeqCst);
        let result = if new_state.is_some() {
            SyncResult::AddGame
        } else {
            SyncResult::RemoveGame
        };
        self.set_game(player_uuid, &config.game_key(), new_state.as_deref());
        Ok(result)
    }

    async fn apply_discord(
        &self,
        config: &PairConfig,
        user_id: u64,
        new_state: Option<String>,
    ) -> Result<SyncResult> {
        self.discord_writes.fetch_add(1, Ordering::SeqCst);
        let result = if new_state.is_some() {
            SyncResult::AddDiscord
        } else {
            SyncResult::RemoveDiscord
        };
        self.set_discord(user_id, config.discord_key(), new_state.as_deref());
        Ok(result)
    }
}
