//! Bridge configuration
//!
//! ```toml
//! [audit]
//! directory = "logs"
//!
//! [[group-sync.pairs]]
//! group = "vip"
//! role = 123
//! direction = "bidirectional"
//! tie-breaker = "game"
//! timer = { enabled = true, cycle-minutes = 5 }
//!
//! [nickname-sync]
//! enabled = true
//! guild = 555
//! direction = "game-to-discord"
//!
//! [[links]]
//! player = "6a1f0b1e-0000-4000-8000-000000000001"
//! user = 42
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use link_core::{AuditLog, StaticLinks, SyncSettings};
use link_roles::{GroupSyncConfig, NicknameSyncConfig};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation;
use crate::{Error, Result};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "linksync.toml";

/// Root of `linksync.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BridgeConfig {
    #[serde(default)]
    pub audit: AuditSection,
    #[serde(default)]
    pub group_sync: GroupSyncSection,
    #[serde(default)]
    pub nickname_sync: Option<NicknameSyncSection>,
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

/// Where audit lines go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AuditSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Defaults to the platform data directory
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupSyncSection {
    #[serde(default)]
    pub pairs: Vec<GroupSyncConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NicknameSyncSection {
    #[serde(default)]
    pub enabled: bool,
    /// Guild whose member nicknames are synchronized
    #[serde(default)]
    pub guild: u64,
    #[serde(flatten)]
    pub settings: SyncSettings,
}

/// A statically configured account link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub player: Uuid,
    pub user: u64,
}

impl FromStr for BridgeConfig {
    type Err = Error;

    /// Parse without validating
    fn from_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl BridgeConfig {
    /// Read, parse and validate the configuration at `path`
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigNotFound`] when the file does not exist and
    /// [`Error::Invalid`] listing every problem found by [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = content.parse()?;
        config.validate()?;
        tracing::debug!(
            path = %path.display(),
            pairs = config.group_sync.pairs.len(),
            links = config.links.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check the configuration for problems the registry cannot recover from
    pub fn validate(&self) -> Result<()> {
        let issues = validation::issues(self);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::Invalid { issues })
        }
    }

    /// Group sync pairs in declaration order
    pub fn group_sync_configs(&self) -> Vec<GroupSyncConfig> {
        self.group_sync.pairs.clone()
    }

    /// The nickname sync, when enabled
    pub fn nickname_sync_config(&self) -> Option<NicknameSyncConfig> {
        self.nickname_sync
            .as_ref()
            .filter(|section| section.enabled)
            .map(|section| NicknameSyncConfig::new(section.guild, section.settings))
    }

    /// The `[[links]]` entries as a link provider
    pub fn static_links(&self) -> StaticLinks {
        StaticLinks::new(self.links.iter().map(|link| (link.player, link.user)))
    }

    /// The audit log, unless disabled or no directory can be determined
    pub fn audit_log(&self) -> Option<AuditLog> {
        if !self.audit.enabled {
            return None;
        }
        let directory = match &self.audit.directory {
            Some(directory) => directory.clone(),
            None => match dirs::data_local_dir() {
                Some(data) => data.join("linksync").join("logs"),
                None => {
                    tracing::warn!("No data directory available, audit log disabled");
                    return None;
                }
            },
        };
        Some(AuditLog::new(directory))
    }
}
