//! Change-driven fan-out
//!
//! A change on one side is applied to every configuration indexed under the
//! changed object. For bidirectional configurations the change then cascades
//! to the other configurations that share the written object, so several
//! objects mapped to the same counterpart stay consistent. The configuration
//! that triggered the change is never cascaded back to.

use std::sync::Arc;

use crate::Error;
use crate::config::SyncConfig;
use crate::module::Synchronizable;
use crate::result::{SyncCause, SyncResult};
use crate::someone::Someone;
use crate::summary::{SummaryReport, SyncSummary};

use super::SyncEngine;
use super::convergence::settle;

type GameId<M> = <<M as Synchronizable>::Config as SyncConfig>::GameId;
type DiscordId<M> = <<M as Synchronizable>::Config as SyncConfig>::DiscordId;

impl<M: Synchronizable> SyncEngine<M> {
    /// Discord-side state of `discord_id` changed to `new_state` for `someone`
    ///
    /// Returns `None` when no configuration is registered for `discord_id`.
    pub async fn discord_changed(
        &self,
        cause: SyncCause,
        someone: Someone,
        discord_id: &DiscordId<M>,
        new_state: Option<M::State>,
    ) -> Option<SummaryReport<M::Config>> {
        let snapshot = self.registry().snapshot();
        let configs = snapshot.configs_for_discord(discord_id).to_vec();
        if configs.is_empty() {
            return None;
        }

        let summary = SyncSummary::new(cause, someone);
        let Some(resolved) = self.resolve_or_fail(&summary).await else {
            return Some(self.finish(summary).await);
        };

        for config in configs {
            if !config.direction().allows_discord_to_game() {
                summary.append_result(config, SyncResult::WrongDirection);
                continue;
            }

            let engine = self.clone();
            let cascade = summary.clone();
            let snapshot = Arc::clone(&snapshot);
            let trigger = Arc::clone(&config);
            let new_state = new_state.clone();
            summary.append_pending(config, async move {
                let intended = if new_state.is_some() {
                    SyncResult::AddGame
                } else {
                    SyncResult::RemoveGame
                };
                let applied = engine
                    .apply_game_if_does_not_match(&trigger, resolved.player_uuid(), new_state)
                    .await?;
                let result = settle(applied, intended);

                if trigger.direction().is_bidirectional()
                    && let Some(game_id) = trigger.game_id()
                {
                    for other in snapshot.configs_for_game(&game_id) {
                        if Arc::ptr_eq(other, &trigger) {
                            continue;
                        }
                        let engine = engine.clone();
                        let target = Arc::clone(other);
                        cascade.append_pending(Arc::clone(other), async move {
                            engine.converge_discord_from_game(&target, resolved).await
                        });
                    }
                }

                Ok::<_, Error>(result)
            });
        }

        Some(self.finish(summary).await)
    }

    /// Game-side state of `game_id` changed to `new_state` for `someone`
    ///
    /// Returns `None` when no configuration is registered for `game_id`.
    pub async fn game_changed(
        &self,
        cause: SyncCause,
        someone: Someone,
        game_id: &GameId<M>,
        new_state: Option<M::State>,
    ) -> Option<SummaryReport<M::Config>> {
        let snapshot = self.registry().snapshot();
        let configs = snapshot.configs_for_game(game_id).to_vec();
        if configs.is_empty() {
            return None;
        }

        let summary = SyncSummary::new(cause, someone);
        let Some(resolved) = self.resolve_or_fail(&summary).await else {
            return Some(self.finish(summary).await);
        };

        for config in configs {
            if !config.direction().allows_game_to_discord() {
                summary.append_result(config, SyncResult::WrongDirection);
                continue;
            }

            let engine = self.clone();
            let cascade = summary.clone();
            let snapshot = Arc::clone(&snapshot);
            let trigger = Arc::clone(&config);
            let new_state = new_state.clone();
            summary.append_pending(config, async move {
                let intended = if new_state.is_some() {
                    SyncResult::AddDiscord
                } else {
                    SyncResult::RemoveDiscord
                };
                let applied = engine
                    .apply_discord_if_does_not_match(&trigger, resolved.user_id(), new_state)
                    .await?;
                let result = settle(applied, intended);

                if trigger.direction().is_bidirectional()
                    && let Some(discord_id) = trigger.discord_id()
                {
                    for other in snapshot.configs_for_discord(&discord_id) {
                        if Arc::ptr_eq(other, &trigger) {
                            continue;
                        }
                        let engine = engine.clone();
                        let target = Arc::clone(other);
                        cascade.append_pending(Arc::clone(other), async move {
                            engine.converge_game_from_discord(&target, resolved).await
                        });
                    }
                }

                Ok::<_, Error>(result)
            });
        }

        Some(self.finish(summary).await)
    }
}
