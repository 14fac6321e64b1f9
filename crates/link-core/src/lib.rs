//! Bidirectional state synchronization between a game server and Discord
//!
//! This crate provides the convergence engine that keeps game-side state
//! (permission groups, nicknames, ...) and Discord-side state (roles, member
//! nicknames, ...) of linked accounts consistent:
//!
//! - **Result taxonomy**: [`SyncResult`] and [`SyncCause`]
//! - **Identity resolution**: [`Someone`] resolved to [`Resolved`] through a [`LinkProvider`]
//! - **Configuration**: [`SyncConfig`] entries with direction, tie-breaker and timer
//! - **Registry**: [`SyncRegistry`] fan-out maps by game id and Discord id
//! - **Engine**: [`SyncEngine`] convergence, fan-out with cascade, periodic timers
//! - **Reporting**: [`SyncSummary`] / [`SummaryReport`] grouped logging and the [`AuditLog`]
//!
//! # Architecture
//!
//! ```text
//!        events / commands / timers
//!                   |
//!               SyncEngine ---- SyncRegistry
//!              /          \
//!     Synchronizable    LinkProvider
//!     (game + Discord
//!      collaborators)
//! ```
//!
//! Transport to Discord and the game server is supplied by implementors of
//! [`Synchronizable`] and [`LinkProvider`].

pub mod audit;
pub mod config;
pub mod engine;
pub mod error;
pub mod link;
pub mod logging;
pub mod module;
pub mod registry;
pub mod result;
pub mod someone;
pub mod summary;

pub use audit::AuditLog;
pub use config::{SyncConfig, SyncDirection, SyncSettings, SyncSide, TimerConfig};
pub use engine::SyncEngine;
pub use error::{Error, Result};
pub use link::{LinkProvider, StaticLinks};
pub use module::Synchronizable;
pub use registry::{RegistrySnapshot, ReloadReport, SyncRegistry};
pub use result::{Permission, SyncCause, SyncResult};
pub use someone::{Resolved, Someone};
pub use summary::{SummaryLine, SummaryReport, SyncSummary};
