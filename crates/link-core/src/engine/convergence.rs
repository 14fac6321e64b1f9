//! Convergence of one configuration for one resolved subject

use uuid::Uuid;

use crate::Result;
use crate::config::{SyncConfig, SyncSide};
use crate::module::Synchronizable;
use crate::result::SyncResult;
use crate::someone::Resolved;

use super::SyncEngine;

/// Pick the reported result once a write was attempted
///
/// A recheck that found the sides already agreeing, or a typed failure from
/// the write, wins over the intended outcome.
pub(crate) fn settle(applied: SyncResult, intended: SyncResult) -> SyncResult {
    if applied == SyncResult::AlreadyInSync || applied.is_error() {
        applied
    } else {
        intended
    }
}

impl<M: Synchronizable> SyncEngine<M> {
    /// Converge `config` for `someone`
    ///
    /// Both sides are read concurrently. When they disagree, the tie-break
    /// side is authoritative: its state (or its absence) is written to the
    /// other side, provided the configured direction allows writing there.
    /// Typed failures are reported as their result.
    pub async fn resync(&self, config: &M::Config, someone: Resolved) -> Result<SyncResult> {
        match self.converge(config, someone).await {
            Err(error) => match error.sync_result() {
                Some(result) => Ok(result),
                None => Err(error),
            },
            converged => converged,
        }
    }

    async fn converge(&self, config: &M::Config, someone: Resolved) -> Result<SyncResult> {
        let module = self.module();
        let (game_state, discord_state) = tokio::try_join!(
            module.get_game(config, someone.player_uuid()),
            module.get_discord(config, someone.user_id()),
        )?;

        if let Some(result) = module.does_state_match(game_state.as_ref(), discord_state.as_ref()) {
            return Ok(result);
        }

        let direction = config.direction();
        match config.tie_breaker() {
            SyncSide::Discord => {
                if !direction.allows_discord_to_game() {
                    return Ok(SyncResult::WrongDirection);
                }
                let intended = if discord_state.is_some() {
                    SyncResult::AddGame
                } else {
                    SyncResult::RemoveGame
                };
                let applied = self
                    .apply_game_if_does_not_match(config, someone.player_uuid(), discord_state)
                    .await?;
                Ok(settle(applied, intended))
            }
            SyncSide::Game => {
                if !direction.allows_game_to_discord() {
                    return Ok(SyncResult::WrongDirection);
                }
                let intended = if game_state.is_some() {
                    SyncResult::AddDiscord
                } else {
                    SyncResult::RemoveDiscord
                };
                let applied = self
                    .apply_discord_if_does_not_match(config, someone.user_id(), game_state)
                    .await?;
                Ok(settle(applied, intended))
            }
        }
    }

    /// Write game-side state unless a fresh read already matches it
    pub async fn apply_game_if_does_not_match(
        &self,
        config: &M::Config,
        player_uuid: Uuid,
        new_state: Option<M::State>,
    ) -> Result<SyncResult> {
        let module = self.module();
        let current = module.get_game(config, player_uuid).await?;
        if let Some(result) = module.does_state_match(current.as_ref(), new_state.as_ref()) {
            return Ok(result);
        }
        module.apply_game(config, player_uuid, new_state).await
    }

    /// Write Discord-side state unless a fresh read already matches it
    pub async fn apply_discord_if_does_not_match(
        &self,
        config: &M::Config,
        user_id: u64,
        new_state: Option<M::State>,
    ) -> Result<SyncResult> {
        let module = self.module();
        let current = module.get_discord(config, user_id).await?;
        if let Some(result) = module.does_state_match(current.as_ref(), new_state.as_ref()) {
            return Ok(result);
        }
        module.apply_discord(config, user_id, new_state).await
    }

    /// Bring the Discord side of `config` in line with the current game state
    pub(crate) async fn converge_discord_from_game(
        &self,
        config: &M::Config,
        someone: Resolved,
    ) -> Result<SyncResult> {
        if !config.direction().allows_game_to_discord() {
            return Ok(SyncResult::WrongDirection);
        }
        let game_state = self.module().get_game(config, someone.player_uuid()).await?;
        let intended = if game_state.is_some() {
            SyncResult::AddDiscord
        } else {
            SyncResult::RemoveDiscord
        };
        let applied = self
            .apply_discord_if_does_not_match(config, someone.user_id(), game_state)
            .await?;
        Ok(settle(applied, intended))
    }

    /// Bring the game side of `config` in line with the current Discord state
    pub(crate) async fn converge_game_from_discord(
        &self,
        config: &M::Config,
        someone: Resolved,
    ) -> Result<SyncResult> {
        if !config.direction().allows_discord_to_game() {
            return Ok(SyncResult::WrongDirection);
        }
        let discord_state = self.module().get_discord(config, someone.user_id()).await?;
        let intended = if discord_state.is_some() {
            SyncResult::AddGame
        } else {
            SyncResult::RemoveGame
        };
        let applied = self
            .apply_game_if_does_not_match(config, someone.player_uuid(), discord_state)
            .await?;
        Ok(settle(applied, intended))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SyncResult::AddGame, SyncResult::AddGame, SyncResult::AddGame)]
    #[case(SyncResult::AlreadyInSync, SyncResult::AddDiscord, SyncResult::AlreadyInSync)]
    #[case(SyncResult::RoleCannotInteract, SyncResult::AddDiscord, SyncResult::RoleCannotInteract)]
    #[case(SyncResult::RemoveDiscord, SyncResult::AddDiscord, SyncResult::AddDiscord)]
    fn settle_prefers_recheck_and_failures(
        #[case] applied: SyncResult,
        #[case] intended: SyncResult,
        #[case] expected: SyncResult,
    ) {
        assert_eq!(settle(applied, intended), expected);
    }
}
