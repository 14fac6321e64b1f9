//! Resync command: run a sync against a world snapshot

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use link_config::BridgeConfig;
use link_core::{LinkProvider, Someone, SummaryReport, SyncCause, SyncEngine, Synchronizable};
use link_roles::{GamePermissions, GroupSyncModule, NicknameSyncModule, World};
use uuid::Uuid;

use crate::error::{CliError, Result};

/// Run the resync command
///
/// # Arguments
///
/// * `config_path` - Bridge configuration
/// * `world_path` - JSON world snapshot, rewritten unless `dry_run`
/// * `player` / `user` - Restrict the resync to one subject
/// * `dry_run` - Leave the snapshot and the audit log untouched
pub fn run_resync(
    config_path: &Path,
    world_path: &Path,
    player: Option<Uuid>,
    user: Option<u64>,
    dry_run: bool,
) -> Result<()> {
    let config = BridgeConfig::load(config_path)?;
    if !world_path.exists() {
        return Err(CliError::user(format!("World snapshot not found: {}", world_path.display())));
    }
    let world = Arc::new(World::load(world_path)?);

    // Links from the configuration take precedence over the snapshot's
    let links: Arc<dyn LinkProvider> = if config.links.is_empty() {
        world.clone()
    } else {
        Arc::new(config.static_links())
    };
    let audit = if dry_run { None } else { config.audit_log() };
    let subject = match (player, user) {
        (Some(player), _) => Some(Someone::player(player)),
        (None, Some(user)) => Some(Someone::user(user)),
        (None, None) => None,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let updates = runtime.block_on(async {
        let permissions = world
            .has_permission_provider()
            .then(|| world.clone() as Arc<dyn GamePermissions>);
        let groups = SyncEngine::new(
            GroupSyncModule::new(world.clone(), permissions),
            links.clone(),
            audit.clone(),
        );
        groups.reload(config.group_sync_configs());
        let mut updates = resync_engine(&groups, subject).await?;
        groups.shutdown();

        if let Some(nickname) = config.nickname_sync_config() {
            let nicknames = SyncEngine::new(
                NicknameSyncModule::new(world.clone(), world.clone()),
                links.clone(),
                audit.clone(),
            );
            nicknames.reload([nickname]);
            updates += resync_engine(&nicknames, subject).await?;
            nicknames.shutdown();
        }

        Ok::<_, CliError>(updates)
    })?;

    println!();
    if dry_run {
        println!(
            "{} {} change(s) would be applied, snapshot not written",
            "Dry run:".yellow().bold(),
            updates
        );
    } else {
        world.save(world_path)?;
        println!("{} {} change(s) applied", "Done:".green().bold(), updates);
    }
    Ok(())
}

async fn resync_engine<M: Synchronizable>(engine: &SyncEngine<M>, subject: Option<Someone>) -> Result<usize> {
    let reports = match subject {
        Some(someone) => vec![engine.resync_all(SyncCause::Command, someone).await],
        None => engine.resync_everyone(SyncCause::Command).await?,
    };
    Ok(reports.iter().map(|report| print_report(engine.module(), report)).sum())
}

/// Print one summary, returning how many configurations were updated
fn print_report<M: Synchronizable>(module: &M, report: &SummaryReport<M::Config>) -> usize {
    println!("{} for {}", module.name().bold(), report.someone());

    let lines = report.lines(module.game_term(), module.discord_term());
    if lines.is_empty() {
        println!("  {}", "nothing to synchronize".dimmed());
    }
    for line in lines {
        let text = if line.result.is_error() {
            line.text.red()
        } else if line.result.is_update() {
            line.text.green()
        } else {
            line.text.normal()
        };
        println!("  {text}");
    }

    report
        .results()
        .iter()
        .filter(|(_, result)| result.is_some_and(|result| result.is_update()))
        .count()
}
