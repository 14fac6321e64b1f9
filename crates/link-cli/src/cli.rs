//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// linksync - Keep game and Discord state of linked accounts in sync
#[derive(Parser, Debug)]
#[command(name = "linksync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Validate the configuration and report what would be registered
    Check {
        /// Configuration file
        #[arg(short, long, default_value = "linksync.toml", env = "LINKSYNC_CONFIG")]
        config: PathBuf,
    },

    /// List the configured synchronizables
    List {
        /// Configuration file
        #[arg(short, long, default_value = "linksync.toml", env = "LINKSYNC_CONFIG")]
        config: PathBuf,
    },

    /// Resync now against a world snapshot
    ///
    /// Without --player or --user every linked account is resynced.
    ///
    /// Examples:
    ///   linksync resync --world world.json
    ///   linksync resync --world world.json --user 42 --dry-run
    Resync {
        /// Configuration file
        #[arg(short, long, default_value = "linksync.toml", env = "LINKSYNC_CONFIG")]
        config: PathBuf,

        /// World snapshot (JSON) to resync against
        #[arg(short, long)]
        world: PathBuf,

        /// Only resync this player
        #[arg(long, conflicts_with = "user")]
        player: Option<Uuid>,

        /// Only resync this Discord user
        #[arg(long)]
        user: Option<u64>,

        /// Do not write the snapshot back or append to the audit log
        #[arg(long)]
        dry_run: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn player_and_user_conflict() {
        let result = Cli::try_parse_from([
            "linksync",
            "resync",
            "--world",
            "w.json",
            "--player",
            "6a1f0b1e-0000-4000-8000-000000000001",
            "--user",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn config_defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["linksync", "check"]).unwrap();
        match cli.command {
            Some(Commands::Check { config }) => assert_eq!(config, PathBuf::from("linksync.toml")),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
