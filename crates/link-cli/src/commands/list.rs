//! List command for configured synchronizables

use std::path::Path;

use colored::Colorize;
use link_config::BridgeConfig;
use link_core::{SyncConfig, SyncRegistry, TimerConfig};
use link_roles::GroupSyncConfig;

use crate::error::Result;

/// Run the list command
pub fn run_list(config_path: &Path) -> Result<()> {
    let config = BridgeConfig::load(config_path)?;

    let registry = SyncRegistry::<GroupSyncConfig>::new();
    registry.reload(config.group_sync_configs());
    let snapshot = registry.snapshot();

    println!("{}", "Group sync".bold());
    if snapshot.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for pair in snapshot.configs() {
        print_entry(&pair.describe(), &**pair);
    }

    println!();
    println!("{}", "Nickname sync".bold());
    match config.nickname_sync_config() {
        Some(nickname) => print_entry(&nickname.describe(), &nickname),
        None => println!("  {}", "disabled".dimmed()),
    }

    Ok(())
}

fn print_entry(name: &str, config: &impl SyncConfig) {
    println!(
        "  {:<24} {:<16} tie-breaker: {:<8} timer: {}",
        name.green(),
        config.direction().to_string(),
        config.tie_breaker().to_string(),
        describe_timer(config.timer())
    );
}

fn describe_timer(timer: TimerConfig) -> String {
    match timer.period() {
        Some(_) => format!("every {} min", timer.cycle_minutes),
        None => "off".to_string(),
    }
}
