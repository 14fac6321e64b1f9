//! Configuration for linksync
//!
//! A single `linksync.toml` describes the audit directory, the group/role
//! pairs, nickname sync and optional static account links. See
//! [`BridgeConfig`] for the format.

pub mod config;
pub mod error;
pub mod validation;

pub use config::{AuditSection, BridgeConfig, GroupSyncSection, LinkEntry, NicknameSyncSection};
pub use error::{Error, Result};
