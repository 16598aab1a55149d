//! Roshambo - best-of-three rock-paper-scissors
//!
//! Two people, or a person and an automated opponent, play up to three
//! rounds. Finished games are written to a pluggable history store.
//!
//! # Architecture
//!
//! - **Games**: moves, round judging, and match scoring
//! - **Players**: move sources for the automated seat
//! - **Session**: one best-of-three match and its rounds
//! - **Service**: the facade callers drive
//! - **Store**: history persistence (SQLite, ledger, or memory)
//! - **Console**: line-oriented front-end used by the binary
//!
//! # Example
//!
//! ```
//! use roshambo::{GameService, GameType, InMemoryHistoryStore, Move, ScriptedMoves};
//!
//! # fn main() -> Result<(), roshambo::SessionError> {
//! let bot = ScriptedMoves::new("Bot", [Move::Rock]).expect("non-empty script");
//! let mut service = GameService::new(InMemoryHistoryStore::new(), bot);
//!
//! service.start_session(GameType::PlayerVsPlayer, "Alice", "Bob")?;
//! service.play_round(Move::Paper, Move::Rock)?;
//! let report = service.play_round(Move::Scissors, Move::Paper)?;
//!
//! assert_eq!(report.game().winner_label(), Some("Alice"));
//! assert_eq!(service.history()?.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod db;
mod games;
mod ledger;
mod players;
mod service;
mod session;
mod store;

// Crate-level exports - Game types
pub use games::rps::{
    DRAW_SENTINEL, Game, GameType, MAX_NAME_LEN, MAX_ROUNDS, Move, NameError, PlayerName,
    RoundOutcome, RoundResult, Seat, Winner, decide, early_winner, judge, match_winner,
};

// Crate-level exports - Move sources
pub use players::{MoveSource, RandomMoves, ScriptedMoves};

// Crate-level exports - Session and service
pub use service::GameService;
pub use session::{RoundReport, Session, SessionError};

// Crate-level exports - History stores
pub use db::{GameRecord, MIGRATIONS, SqliteHistoryStore};
pub use ledger::{
    GameResultEvent, JsonlLedger, LedgerClient, LedgerEntry, LedgerHistoryStore, Receipt,
    WINNER_DRAW, WINNER_PLAYER_ONE, WINNER_PLAYER_TWO,
};
pub use store::{HistoryStore, InMemoryHistoryStore, StoreError, open_store};

// Crate-level exports - Configuration
pub use config::{
    AppConfig, ConfigError, ENV_BOT_NAME, ENV_DATA_DIR, ENV_DB_FILE, ENV_LEDGER_FILE, ENV_STORE,
    StorageKind,
};

// Crate-level exports - Console front-end
pub use console::{Console, render_history};
