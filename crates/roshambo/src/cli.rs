//! Command-line interface for roshambo.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use roshambo::StorageKind;

/// Roshambo - best-of-three rock-paper-scissors
#[derive(Parser, Debug)]
#[command(name = "roshambo")]
#[command(about = "Best-of-three rock-paper-scissors with persistent history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// History backend (overrides config and ROSHAMBO_STORE)
    #[arg(long, value_enum, global = true)]
    pub store: Option<StorageKind>,

    /// Directory for database and ledger files (overrides config and DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively at the console
    Play {
        /// Seed for the bot, for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print stored game history and exit
    History {
        /// Print one JSON object per game instead of the table
        #[arg(long)]
        json: bool,
    },
}
