//! Validation of a parsed [`BridgeConfig`]

use std::collections::HashSet;

use link_core::{SyncConfig, SyncSettings};

use crate::config::BridgeConfig;

/// Every problem found in `config`, in file order
///
/// Pairs that are merely unset (empty group, role 0) are not problems; the
/// registry skips them.
pub fn issues(config: &BridgeConfig) -> Vec<String> {
    let mut issues = Vec::new();

    for (index, pair) in config.group_sync.pairs.iter().enumerate() {
        check_settings(&format!("group-sync pair {} ({})", index + 1, pair.describe()), &pair.settings, &mut issues);
        if !pair.is_set() {
            tracing::warn!(pair = %pair.describe(), "Group sync pair is not set and will be skipped");
        }
    }

    if let Some(nickname) = &config.nickname_sync
        && nickname.enabled
    {
        check_settings("nickname-sync", &nickname.settings, &mut issues);
        if nickname.guild == 0 {
            issues.push("nickname-sync is enabled but has no guild".to_string());
        }
    }

    let mut players = HashSet::new();
    let mut users = HashSet::new();
    for link in &config.links {
        if !players.insert(link.player) {
            issues.push(format!("player {} is linked more than once", link.player));
        }
        if !users.insert(link.user) {
            issues.push(format!("user {} is linked more than once", link.user));
        }
    }

    issues
}

fn check_settings(name: &str, settings: &SyncSettings, issues: &mut Vec<String>) {
    if settings.timer.enabled && settings.timer.cycle_minutes == 0 {
        issues.push(format!("{name}: timer cycle-minutes must be at least 1"));
    }
}
