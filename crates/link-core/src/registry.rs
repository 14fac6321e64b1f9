//! Sync registry
//!
//! Holds the active generation of configurations and indexes them by
//! game id and by Discord id for change-driven fan-out.
//!
//! Each reload builds a fresh [`RegistrySnapshot`] and swaps it in whole.
//! Readers clone the current `Arc` and never observe a partially built
//! generation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::config::SyncConfig;

/// One immutable generation of registered configurations
#[derive(Debug)]
pub struct RegistrySnapshot<C: SyncConfig> {
    generation: u64,
    configs: Vec<Arc<C>>,
    for_game: HashMap<C::GameId, Vec<Arc<C>>>,
    for_discord: HashMap<C::DiscordId, Vec<Arc<C>>>,
}

impl<C: SyncConfig> RegistrySnapshot<C> {
    fn empty(generation: u64) -> Self {
        Self {
            generation,
            configs: Vec::new(),
            for_game: HashMap::new(),
            for_discord: HashMap::new(),
        }
    }

    /// Reload generation, starting at 0 for the empty registry
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// All accepted configurations in registration order
    pub fn configs(&self) -> &[Arc<C>] {
        &self.configs
    }

    /// Configurations indexed under `game_id`, in registration order
    pub fn configs_for_game(&self, game_id: &C::GameId) -> &[Arc<C>] {
        self.for_game.get(game_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Configurations indexed under `discord_id`, in registration order
    pub fn configs_for_discord(&self, discord_id: &C::DiscordId) -> &[Arc<C>] {
        self.for_discord.get(discord_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// What a reload accepted and rejected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Generation installed by this reload
    pub generation: u64,
    /// Number of configurations registered
    pub accepted: usize,
    /// Number of configurations skipped because they are not set
    pub skipped_unset: usize,
    /// Descriptions of configurations rejected as duplicates
    pub duplicates: Vec<String>,
}

/// Registry of live synchronizable configurations
#[derive(Debug)]
pub struct SyncRegistry<C: SyncConfig> {
    current: RwLock<Arc<RegistrySnapshot<C>>>,
    reload_lock: Mutex<()>,
}

impl<C: SyncConfig> Default for SyncRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SyncConfig> SyncRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::empty(0))),
            reload_lock: Mutex::new(()),
        }
    }

    /// The current generation
    pub fn snapshot(&self) -> Arc<RegistrySnapshot<C>> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace every registered configuration
    ///
    /// Unset configurations are skipped. A configuration that
    /// [`is_same_as`](SyncConfig::is_same_as) an already accepted one is
    /// rejected and logged. Accepted configurations are indexed under their
    /// game id and Discord id when present; one with neither is only
    /// reachable through resync-all.
    pub fn reload(&self, configs: impl IntoIterator<Item = C>) -> ReloadReport {
        let _guard = self.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = self.snapshot().generation + 1;
        let mut next: RegistrySnapshot<C> = RegistrySnapshot::empty(generation);
        let mut report = ReloadReport {
            generation,
            ..ReloadReport::default()
        };

        for config in configs {
            if !config.is_set() {
                tracing::debug!(config = %config.describe(), "Skipping synchronizable that is not set");
                report.skipped_unset += 1;
                continue;
            }

            if next.configs.iter().any(|existing| existing.is_same_as(&config)) {
                tracing::error!(
                    config = %config.describe(),
                    "Duplicate synchronizable configuration, only the first one will be used"
                );
                report.duplicates.push(config.describe());
                continue;
            }

            let config = Arc::new(config);
            if let Some(game_id) = config.game_id() {
                next.for_game.entry(game_id).or_default().push(Arc::clone(&config));
            }
            if let Some(discord_id) = config.discord_id() {
                next.for_discord
                    .entry(discord_id)
                    .or_default()
                    .push(Arc::clone(&config));
            }
            next.configs.push(config);
        }

        report.accepted = next.configs.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);

        tracing::info!(
            generation,
            accepted = report.accepted,
            duplicates = report.duplicates.len(),
            "Reloaded synchronizables"
        );
        report
    }
}
