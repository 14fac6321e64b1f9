//! Sync summaries
//!
//! A [`SyncSummary`] collects the pending result of every configuration
//! touched by one invocation (one subject, one cause). Resolving it yields a
//! [`SummaryReport`], which groups results for logging and auditing.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{BoxFuture, FutureExt, join_all};

use crate::Result;
use crate::audit::AuditLog;
use crate::config::SyncConfig;
use crate::module::Synchronizable;
use crate::result::{SyncCause, SyncResult};
use crate::someone::Someone;

type PendingResult = BoxFuture<'static, Result<SyncResult>>;

/// Results of one invocation, still being computed
///
/// Cloning yields another handle to the same summary, so a pending result
/// may append further entries (cascades) while it runs.
pub struct SyncSummary<C: SyncConfig> {
    cause: SyncCause,
    someone: Someone,
    state: Arc<Mutex<SummaryState<C>>>,
}

struct SummaryState<C> {
    all_fail_reason: Option<SyncResult>,
    pending: Vec<(Arc<C>, PendingResult)>,
}

impl<C: SyncConfig> Clone for SyncSummary<C> {
    fn clone(&self) -> Self {
        Self {
            cause: self.cause,
            someone: self.someone,
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: SyncConfig> SyncSummary<C> {
    pub fn new(cause: SyncCause, someone: Someone) -> Self {
        Self {
            cause,
            someone,
            state: Arc::new(Mutex::new(SummaryState {
                all_fail_reason: None,
                pending: Vec::new(),
            })),
        }
    }

    pub fn cause(&self) -> SyncCause {
        self.cause
    }

    pub fn someone(&self) -> Someone {
        self.someone
    }

    /// Fail the whole invocation with one reason
    ///
    /// Per-configuration results are discarded.
    pub fn fail_all(&self, reason: SyncResult) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.all_fail_reason = Some(reason);
        state.pending.clear();
    }

    /// Record a completed result for `config`
    pub fn append_result(&self, config: Arc<C>, result: SyncResult) {
        self.append_pending(config, futures::future::ready(Ok(result)));
    }

    /// Record a result for `config` that completes later
    pub fn append_pending<F>(&self, config: Arc<C>, result: F)
    where
        F: Future<Output = Result<SyncResult>> + Send + 'static,
    {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.all_fail_reason.is_none() {
            state.pending.push((config, result.boxed()));
        }
    }

    /// Wait for every recorded result
    ///
    /// Entries run concurrently and may complete out of order. A typed
    /// failure is unwrapped into its result. Any other failure is logged
    /// with its context and recorded as `None`.
    pub async fn resolve(self) -> SummaryReport<C> {
        let mut results = Vec::new();

        loop {
            let batch = {
                let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
                std::mem::take(&mut state.pending)
            };
            if batch.is_empty() {
                break;
            }

            let (configs, futures): (Vec<_>, Vec<_>) = batch.into_iter().unzip();
            for (config, outcome) in configs.into_iter().zip(join_all(futures).await) {
                let result = match outcome {
                    Ok(result) => Some(result),
                    Err(error) => match error.sync_result() {
                        Some(result) => Some(result),
                        None => {
                            tracing::error!(
                                someone = %self.someone,
                                cause = %self.cause,
                                config = %config.describe(),
                                error = %error,
                                "Failed to synchronize"
                            );
                            None
                        }
                    },
                };
                results.push((config, result));
            }
        }

        let all_fail_reason = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .all_fail_reason;
        if all_fail_reason.is_some() {
            results.clear();
        }

        SummaryReport {
            cause: self.cause,
            someone: self.someone,
            all_fail_reason,
            results,
        }
    }
}

/// One rendered summary line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub result: SyncResult,
    pub text: String,
}

/// Completed results of one invocation
#[derive(Debug)]
pub struct SummaryReport<C: SyncConfig> {
    cause: SyncCause,
    someone: Someone,
    all_fail_reason: Option<SyncResult>,
    results: Vec<(Arc<C>, Option<SyncResult>)>,
}

impl<C: SyncConfig> SummaryReport<C> {
    pub fn cause(&self) -> SyncCause {
        self.cause
    }

    pub fn someone(&self) -> Someone {
        self.someone
    }

    /// Reason every configuration failed, if the invocation was cut short
    pub fn all_fail_reason(&self) -> Option<SyncResult> {
        self.all_fail_reason
    }

    /// Per-configuration results in completion-batch order
    ///
    /// `None` marks an unexpected failure that was already logged.
    pub fn results(&self) -> &[(Arc<C>, Option<SyncResult>)] {
        &self.results
    }

    /// Result recorded for the configuration that `is_same_as(config)`
    pub fn result_for(&self, config: &C) -> Option<SyncResult> {
        self.results
            .iter()
            .find(|(entry, _)| entry.is_same_as(config))
            .and_then(|(_, result)| *result)
    }

    /// Configurations grouped by result, in first-seen order
    pub fn grouped(&self) -> Vec<(SyncResult, Vec<Arc<C>>)> {
        let mut groups: Vec<(SyncResult, Vec<Arc<C>>)> = Vec::new();
        for (config, result) in &self.results {
            let Some(result) = result else { continue };
            match groups.iter_mut().find(|(existing, _)| existing == result) {
                Some((_, configs)) => configs.push(Arc::clone(config)),
                None => groups.push((*result, vec![Arc::clone(config)])),
            }
        }
        groups
    }

    /// Render grouped lines as `"<result>: [config, ...]"`
    pub fn lines(&self, game_term: &str, discord_term: &str) -> Vec<SummaryLine> {
        if let Some(reason) = self.all_fail_reason {
            return vec![SummaryLine {
                result: reason,
                text: reason.format(game_term, discord_term),
            }];
        }

        self.grouped()
            .into_iter()
            .map(|(result, configs)| {
                let described: Vec<String> = configs.iter().map(|config| config.describe()).collect();
                SummaryLine {
                    result,
                    text: format!(
                        "{}: [{}]",
                        result.format(game_term, discord_term),
                        described.join(", ")
                    ),
                }
            })
            .collect()
    }

    /// Log this report for `module`
    ///
    /// Successful lines go to debug and failed lines to error. Lines that
    /// record a mutation are also appended to the audit log.
    pub fn log<M>(&self, module: &M, audit: Option<&AuditLog>)
    where
        M: Synchronizable<Config = C>,
    {
        let header = format!("{} for {} ({})", module.name(), self.someone, self.cause);
        let lines = self.lines(module.game_term(), module.discord_term());

        let mut audited = Vec::new();
        for line in &lines {
            if line.result.is_error() {
                tracing::error!("{header}: {}", line.text);
            } else {
                tracing::debug!("{header}: {}", line.text);
            }
            if line.result.is_update() {
                audited.push(format!("{header}: {}", line.text));
            }
        }

        if let Some(audit) = audit
            && let Err(error) = audit.append(module.log_file_name(), &audited)
        {
            tracing::warn!(
                directory = %audit.directory().display(),
                error = %error,
                "Failed to write audit log"
            );
        }
    }
}
