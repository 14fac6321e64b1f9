//! Configuration and subject fixtures

use std::sync::Arc;

use link_core::{AuditLog, StaticLinks, SyncConfig, SyncDirection, SyncSettings, SyncSide};
use tempfile::TempDir;
use uuid::Uuid;

/// A game-group/Discord-role style pairing for engine tests
#[derive(Debug, Clone)]
pub struct PairConfig {
    pub group: Option<String>,
    pub role: Option<u64>,
    pub settings: SyncSettings,
}

impl PairConfig {
    /// A bidirectional pairing with the game side as tie-breaker
    pub fn new(group: &str, role: u64) -> Self {
        Self {
            group: Some(group.to_string()),
            role: Some(role),
            settings: SyncSettings::default(),
        }
    }

    /// A pairing reachable only through resync-all
    pub fn unaddressed() -> Self {
        Self {
            group: None,
            role: None,
            settings: SyncSettings::default(),
        }
    }

    pub fn with_direction(mut self, direction: SyncDirection) -> Self {
        self.settings.direction = direction;
        self
    }

    pub fn with_tie_breaker(mut self, side: SyncSide) -> Self {
        self.settings.tie_breaker = side;
        self
    }

    pub fn with_timer(mut self, cycle_minutes: u64) -> Self {
        self.settings = self.settings.with_timer(cycle_minutes);
        self
    }

    /// Key used by [`MemoryModule`](crate::MemoryModule) for the game side
    pub fn game_key(&self) -> String {
        self.group.clone().unwrap_or_default()
    }

    /// Key used by [`MemoryModule`](crate::MemoryModule) for the Discord side
    pub fn discord_key(&self) -> u64 {
        self.role.unwrap_or_default()
    }
}

impl SyncConfig for PairConfig {
    type GameId = String;
    type DiscordId = u64;

    fn game_id(&self) -> Option<String> {
        self.group.clone()
    }

    fn discord_id(&self) -> Option<u64> {
        self.role
    }

    fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    fn is_set(&self) -> bool {
        self.group.as_deref() != Some("") && self.role != Some(0)
    }

    fn is_same_as(&self, other: &Self) -> bool {
        self.group == other.group && self.role == other.role
    }

    fn describe(&self) -> String {
        format!(
            "{}:{}",
            self.group.as_deref().unwrap_or("*"),
            self.role.map(|role| role.to_string()).unwrap_or_else(|| "*".to_string())
        )
    }
}

/// A fresh player linked to `user_id`
pub fn linked_pair(user_id: u64) -> (Uuid, Arc<StaticLinks>) {
    let player = Uuid::new_v4();
    (player, Arc::new(StaticLinks::new([(player, user_id)])))
}

/// An audit log inside a temporary directory
///
/// Keep the returned [`TempDir`] alive for as long as the log is used.
pub fn temp_audit_dir() -> (TempDir, AuditLog) {
    let temp = TempDir::new().unwrap();
    let audit = AuditLog::new(temp.path().join("audit"));
    (temp, audit)
}
