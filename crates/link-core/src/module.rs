//! Synchronizable kinds
//!
//! A [`Synchronizable`] supplies the side-specific reads and writes the
//! convergence engine composes. One implementation exists per kind of
//! synchronized state (group/role membership, nicknames, ...).

use std::fmt;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::config::SyncConfig;
use crate::result::SyncResult;

/// Reads and writes one kind of synchronized state on both sides
///
/// State is passed as `Option<State>`, where `None` means absent or unset.
/// Writing `None` clears that side.
#[async_trait]
pub trait Synchronizable: Send + Sync + 'static {
    type Config: SyncConfig;
    type State: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Human-readable name used in summaries, e.g. `"Group sync"`
    fn name(&self) -> &str;

    /// Base name of the daily audit log file
    fn log_file_name(&self) -> &str;

    /// What the game-side state is called, e.g. `"group"`
    fn game_term(&self) -> &str;

    /// What the Discord-side state is called, e.g. `"role"`
    fn discord_term(&self) -> &str;

    /// Read the current game-side state
    async fn get_game(&self, config: &Self::Config, player_uuid: Uuid) -> Result<Option<Self::State>>;

    /// Read the current Discord-side state
    async fn get_discord(&self, config: &Self::Config, user_id: u64) -> Result<Option<Self::State>>;

    /// Write game-side state, `None` clears it
    async fn apply_game(
        &self,
        config: &Self::Config,
        player_uuid: Uuid,
        new_state: Option<Self::State>,
    ) -> Result<SyncResult>;

    /// Write Discord-side state, `None` clears it
    async fn apply_discord(
        &self,
        config: &Self::Config,
        user_id: u64,
        new_state: Option<Self::State>,
    ) -> Result<SyncResult>;

    /// Judge whether two states agree
    ///
    /// Returns the result to report when no change is needed, usually
    /// [`SyncResult::AlreadyInSync`], or `None` when a correction is needed.
    fn does_state_match(&self, one: Option<&Self::State>, two: Option<&Self::State>) -> Option<SyncResult> {
        (one == two).then_some(SyncResult::AlreadyInSync)
    }
}
