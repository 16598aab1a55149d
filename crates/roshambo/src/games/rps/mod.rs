//! Best-of-three rock-paper-scissors.

mod name;
mod rules;
mod types;

pub use name::{DRAW_SENTINEL, MAX_NAME_LEN, NameError, PlayerName};
pub use rules::{MAX_ROUNDS, RoundOutcome, decide, early_winner, judge, match_winner};
pub use types::{Game, GameType, Move, RoundResult, Seat, Winner};
