//! SyncEngine implementation
//!
//! The engine owns one [`Synchronizable`] kind, its [`SyncRegistry`], and
//! the periodic timers of the current registry generation. It provides:
//!
//! - **resync**: converge one configuration for one resolved subject
//! - **resync_all**: converge every configuration for one subject
//! - **game_changed / discord_changed**: targeted fan-out with cascade
//! - **event entry points**: player connect, Discord member join, linking
//!
//! Every multi-configuration operation produces one [`SummaryReport`], which
//! is logged (and audited) before it is returned.

mod convergence;
mod fanout;
mod timer;

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::time::{Instant, interval_at};
use uuid::Uuid;

use crate::Result;
use crate::audit::AuditLog;
use crate::config::SyncConfig;
use crate::link::LinkProvider;
use crate::module::Synchronizable;
use crate::registry::{ReloadReport, SyncRegistry};
use crate::result::{SyncCause, SyncResult};
use crate::someone::{Resolved, Someone};
use crate::summary::{SummaryReport, SyncSummary};

use timer::SyncTimers;

/// Convergence engine for one synchronizable kind
///
/// Cloning is cheap and yields a handle to the same engine.
pub struct SyncEngine<M: Synchronizable> {
    inner: Arc<EngineInner<M>>,
}

struct EngineInner<M: Synchronizable> {
    module: M,
    links: Arc<dyn LinkProvider>,
    registry: SyncRegistry<M::Config>,
    timers: SyncTimers,
    audit: Option<AuditLog>,
    reload_lock: Mutex<()>,
}

impl<M: Synchronizable> Drop for EngineInner<M> {
    fn drop(&mut self) {
        self.timers.cancel_all();
    }
}

impl<M: Synchronizable> Clone for SyncEngine<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Synchronizable> SyncEngine<M> {
    /// Create an engine with an empty registry
    ///
    /// # Arguments
    ///
    /// * `module` - The synchronizable kind this engine converges
    /// * `links` - Account link lookup
    /// * `audit` - Where mutation lines are recorded, if anywhere
    pub fn new(module: M, links: Arc<dyn LinkProvider>, audit: Option<AuditLog>) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                module,
                links,
                registry: SyncRegistry::new(),
                timers: SyncTimers::default(),
                audit,
                reload_lock: Mutex::new(()),
            }),
        }
    }

    pub fn module(&self) -> &M {
        &self.inner.module
    }

    pub fn registry(&self) -> &SyncRegistry<M::Config> {
        &self.inner.registry
    }

    pub fn links(&self) -> &dyn LinkProvider {
        self.inner.links.as_ref()
    }

    /// Number of periodic timers currently scheduled
    pub fn active_timers(&self) -> usize {
        self.inner.timers.len()
    }

    /// Install a new generation of configurations
    ///
    /// Timers of the previous generation are cancelled before the registry
    /// is swapped. Every accepted configuration with an enabled timer then
    /// gets a fixed-rate resync for all linked subjects. Timers are only
    /// scheduled when called from within a Tokio runtime.
    pub fn reload(&self, configs: impl IntoIterator<Item = M::Config>) -> ReloadReport {
        let _guard = self.inner.reload_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let cancelled = self.inner.timers.cancel_all();
        if cancelled > 0 {
            tracing::debug!(cancelled, module = self.module().name(), "Cancelled resync timers");
        }

        let report = self.inner.registry.reload(configs);

        let runtime = tokio::runtime::Handle::try_current();
        for config in self.inner.registry.snapshot().configs() {
            let Some(period) = config.timer().period() else {
                continue;
            };
            match &runtime {
                Ok(handle) => self.schedule_timer(handle, Arc::clone(config), period),
                Err(_) => tracing::warn!(
                    config = %config.describe(),
                    "No async runtime available, resync timer not scheduled"
                ),
            }
        }

        report
    }

    /// Stop every periodic timer
    pub fn shutdown(&self) {
        self.inner.timers.cancel_all();
    }

    fn schedule_timer(&self, runtime: &tokio::runtime::Handle, config: Arc<M::Config>, period: Duration) {
        let token = self.inner.timers.register();
        let engine: Weak<EngineInner<M>> = Arc::downgrade(&self.inner);
        tracing::info!(
            config = %config.describe(),
            period_secs = period.as_secs(),
            "Scheduled resync timer"
        );

        runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticks.tick() => {
                        let Some(inner) = engine.upgrade() else { break };
                        let engine = SyncEngine { inner };
                        let config = Arc::clone(&config);
                        tokio::spawn(async move {
                            if let Err(error) = engine.resync_config_for_everyone(SyncCause::Timer, config).await {
                                tracing::error!(error = %error, "Timed resync failed");
                            }
                        });
                    }
                }
            }
        });
    }

    /// Converge every registered configuration for `someone`
    pub async fn resync_all(&self, cause: SyncCause, someone: impl Into<Someone>) -> SummaryReport<M::Config> {
        let configs = self.registry().snapshot().configs().to_vec();
        self.resync_configs(cause, someone.into(), configs).await
    }

    /// Converge `configs` for `someone`, producing one summary
    pub async fn resync_configs(
        &self,
        cause: SyncCause,
        someone: Someone,
        configs: Vec<Arc<M::Config>>,
    ) -> SummaryReport<M::Config> {
        let summary = SyncSummary::new(cause, someone);

        if let Some(resolved) = self.resolve_or_fail(&summary).await {
            for config in configs {
                let engine = self.clone();
                let target = Arc::clone(&config);
                summary.append_pending(config, async move { engine.resync(&target, resolved).await });
            }
        }

        self.finish(summary).await
    }

    /// Converge `config` for every linked subject
    ///
    /// Each subject runs as an independent task with its own summary.
    pub async fn resync_config_for_everyone(
        &self,
        cause: SyncCause,
        config: Arc<M::Config>,
    ) -> Result<Vec<SummaryReport<M::Config>>> {
        let accounts = self.links().linked_accounts().await?;
        let tasks: Vec<_> = accounts
            .into_iter()
            .map(|resolved| {
                let engine = self.clone();
                let config = Arc::clone(&config);
                tokio::spawn(async move { engine.resync_configs(cause, resolved.into(), vec![config]).await })
            })
            .collect();
        Ok(collect_reports(tasks).await)
    }

    /// Converge every configuration for every linked subject
    pub async fn resync_everyone(&self, cause: SyncCause) -> Result<Vec<SummaryReport<M::Config>>> {
        let accounts = self.links().linked_accounts().await?;
        let tasks: Vec<_> = accounts
            .into_iter()
            .map(|resolved| {
                let engine = self.clone();
                tokio::spawn(async move { engine.resync_all(cause, resolved).await })
            })
            .collect();
        Ok(collect_reports(tasks).await)
    }

    /// A player connected to the game server
    pub async fn on_player_connected(&self, player_uuid: Uuid) -> SummaryReport<M::Config> {
        self.resync_all(SyncCause::PlayerJoin, Someone::player(player_uuid)).await
    }

    /// A user joined the Discord guild
    pub async fn on_discord_member_joined(&self, user_id: u64) -> SummaryReport<M::Config> {
        self.resync_all(SyncCause::DiscordMemberJoin, Someone::user(user_id)).await
    }

    /// A player linked their Discord account
    pub async fn on_account_linked(&self, player_uuid: Uuid, user_id: u64) -> SummaryReport<M::Config> {
        self.resync_all(SyncCause::AccountLinked, Someone::both(player_uuid, user_id))
            .await
    }

    /// Resolve the summary's subject, failing the summary when that is impossible
    async fn resolve_or_fail(&self, summary: &SyncSummary<M::Config>) -> Option<Resolved> {
        match summary.someone().with_linked_accounts(self.links()).await {
            Ok(Some(resolved)) => Some(resolved),
            Ok(None) => {
                summary.fail_all(SyncResult::NotLinked);
                None
            }
            Err(error) => {
                tracing::error!(
                    someone = %summary.someone(),
                    cause = %summary.cause(),
                    error = %error,
                    "Failed to look up linked account"
                );
                summary.fail_all(SyncResult::Failed);
                None
            }
        }
    }

    async fn finish(&self, summary: SyncSummary<M::Config>) -> SummaryReport<M::Config> {
        let report = summary.resolve().await;
        report.log(self.module(), self.inner.audit.as_ref());
        report
    }
}

async fn collect_reports<C: SyncConfig>(
    tasks: Vec<tokio::task::JoinHandle<SummaryReport<C>>>,
) -> Vec<SummaryReport<C>> {
    let mut reports = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(report) => reports.push(report),
            Err(error) => tracing::error!(error = %error, "Resync task did not complete"),
        }
    }
    reports
}
