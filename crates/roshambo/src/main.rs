//! Roshambo - console rock-paper-scissors
//!
//! Plays best-of-three matches and records the results.

#![warn(missing_docs)]

mod cli;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use roshambo::{
    AppConfig, Console, GameService, HistoryStore, RandomMoves, open_store, render_history,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with prompts.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Command::Play { seed } => run_play(&config, seed),
        Command::History { json } => run_history(&config, json),
    }
}

/// Layers CLI flags over the file and environment.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(store) = cli.store {
        config = config.with_storage(store);
    }
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    Ok(config)
}

/// Run the interactive console
#[instrument(skip(config), fields(storage = %config.storage()))]
fn run_play(config: &AppConfig, seed: Option<u64>) -> Result<()> {
    let store = open_store(config).context("opening history store")?;
    let bot = match seed {
        Some(seed) => RandomMoves::with_seed(config.bot_name().clone(), seed),
        None => RandomMoves::new(config.bot_name().clone()),
    };
    info!(bot = config.bot_name().as_str(), "Starting game");

    let service = GameService::new(store, bot);
    let stdin = io::stdin();
    let mut console = Console::new(service, stdin.lock(), io::stdout());
    console.run()
}

/// Print stored history
#[instrument(skip(config), fields(storage = %config.storage()))]
fn run_history(config: &AppConfig, json: bool) -> Result<()> {
    let store = open_store(config).context("opening history store")?;
    let games = store.fetch().context("reading game history")?;
    info!(count = games.len(), "History loaded");

    let mut out = io::stdout().lock();
    if json {
        for game in &games {
            let record = serde_json::json!({
                "id": game.id(),
                "player1": game.player_one(),
                "player2": game.player_two(),
                "winner": game.winner_label(),
                "played_at": game.played_at(),
            });
            writeln!(out, "{}", record)?;
        }
    } else {
        render_history(&games, &mut out)?;
    }
    Ok(())
}
