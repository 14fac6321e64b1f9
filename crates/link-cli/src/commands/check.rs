//! Check command: validate configuration and dry-run a registry reload

use std::path::Path;

use colored::Colorize;
use link_config::BridgeConfig;
use link_core::{SyncConfig, SyncRegistry};
use link_roles::GroupSyncConfig;

use crate::error::Result;

/// Run the check command
pub fn run_check(config_path: &Path) -> Result<()> {
    let config = BridgeConfig::load(config_path)?;

    println!("{} {}", "Checking".bold(), config_path.display());

    let registry = SyncRegistry::<GroupSyncConfig>::new();
    let report = registry.reload(config.group_sync_configs());
    println!(
        "  group sync: {} accepted, {} skipped, {} duplicate",
        report.accepted,
        report.skipped_unset,
        report.duplicates.len()
    );
    for duplicate in &report.duplicates {
        println!("    {} duplicate pair {} ignored", "warning:".yellow().bold(), duplicate);
    }

    match config.nickname_sync_config() {
        Some(nickname) => println!("  nickname sync: {}", nickname.describe()),
        None => println!("  nickname sync: {}", "disabled".dimmed()),
    }
    println!("  static links: {}", config.links.len());
    match config.audit_log() {
        Some(audit) => println!("  audit log: {}", audit.directory().display()),
        None => println!("  audit log: {}", "disabled".dimmed()),
    }

    println!();
    println!("{} Configuration OK", "OK".green().bold());
    Ok(())
}
