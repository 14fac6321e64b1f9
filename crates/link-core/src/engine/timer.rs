//! Cancellation of periodic resync timers

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Tokens of the timers scheduled for the current registry generation
#[derive(Debug, Default)]
pub(crate) struct SyncTimers {
    active: Mutex<Vec<CancellationToken>>,
}

impl SyncTimers {
    /// Register a new timer and return its token
    pub(crate) fn register(&self) -> CancellationToken {
        let token = CancellationToken::new();
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(token.clone());
        token
    }

    /// Cancel every registered timer
    ///
    /// Only future ticks are prevented; resyncs already started by a tick
    /// run to completion.
    pub(crate) fn cancel_all(&self) -> usize {
        let tokens = std::mem::take(&mut *self.active.lock().unwrap_or_else(PoisonError::into_inner));
        for token in &tokens {
            token.cancel();
        }
        tokens.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
