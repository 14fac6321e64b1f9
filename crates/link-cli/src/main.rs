//! linksync CLI
//!
//! Validate a bridge configuration, list its synchronizables, and run a
//! resync against a world snapshot.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let directive = if cli.verbose { "debug" } else { "warn" };
    if let Err(e) = link_core::logging::init(directive) {
        eprintln!("{} {}", "warning:".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} game/Discord state synchronization", "linksync".green().bold());
            println!();
            println!("Run {} for available commands.", "linksync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Check { config } => commands::run_check(&config),
        Commands::List { config } => commands::run_list(&config),
        Commands::Resync {
            config,
            world,
            player,
            user,
            dry_run,
        } => commands::run_resync(&config, &world, player, user, dry_run),
    }
}
