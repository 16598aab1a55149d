//! Core domain types for rock-paper-scissors.

use chrono::{DateTime, SubsecRound, Utc};
use derive_getters::Getters;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};
use tracing::instrument;
use uuid::Uuid;

use super::name::{DRAW_SENTINEL, PlayerName};

/// A hand shape thrown in one round.
///
/// Parses case-insensitively from the full word or its first letter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Move {
    /// Beats scissors.
    #[strum(serialize = "rock", serialize = "r")]
    Rock,
    /// Beats rock.
    #[strum(serialize = "paper", serialize = "p")]
    Paper,
    /// Beats paper.
    #[strum(serialize = "scissors", serialize = "s")]
    Scissors,
}

impl Move {
    /// Every move, in declaration order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Returns the move this one defeats.
    pub fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Paper => Move::Rock,
            Move::Scissors => Move::Paper,
        }
    }
}

/// Who sits in the second seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum GameType {
    /// Two humans take turns at the same console.
    #[display("Player vs Player")]
    PlayerVsPlayer,
    /// The second seat is filled by a move source.
    #[display("Player vs Bot")]
    PlayerVsAutomated,
}

/// One side of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Seat {
    /// The player who supplies the first move.
    #[display("player 1")]
    PlayerOne,
    /// The player (or bot) who supplies the second move.
    #[display("player 2")]
    PlayerTwo,
}

/// Result of a round or a whole game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    /// The player in the given seat won.
    Player(Seat),
    /// Nobody won.
    Draw,
}

impl Winner {
    /// Maps a persisted winner label onto the seats of a game.
    ///
    /// Player one is preferred when both players share a name.
    pub fn from_label(label: &str, player_one: &str, player_two: &str) -> Option<Winner> {
        if label == player_one {
            Some(Winner::Player(Seat::PlayerOne))
        } else if label == player_two {
            Some(Winner::Player(Seat::PlayerTwo))
        } else if label == DRAW_SENTINEL {
            Some(Winner::Draw)
        } else {
            None
        }
    }
}

/// Both moves of one round and who took it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    first: Move,
    second: Move,
    winner: Winner,
}

impl RoundResult {
    /// Judges the two moves and records the round.
    #[instrument]
    pub fn new(first: Move, second: Move) -> Self {
        let winner = super::rules::judge(first, second).winner();
        Self {
            first,
            second,
            winner,
        }
    }

    /// Move thrown by player one.
    pub fn first(&self) -> Move {
        self.first
    }

    /// Move thrown by player two.
    pub fn second(&self) -> Move {
        self.second
    }

    /// Who took the round.
    pub fn winner(&self) -> Winner {
        self.winner
    }
}

/// One best-of-three match between two named players.
///
/// The winner stays unset while the match is in progress and is written
/// exactly once when the match is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Game {
    /// Globally unique id (UUID v4).
    id: String,
    /// Name of the player in the first seat.
    player_one: String,
    /// Name of the player in the second seat.
    player_two: String,
    #[getter(skip)]
    winner: Option<Winner>,
    /// When the match started, truncated to milliseconds.
    played_at: DateTime<Utc>,
}

impl Game {
    /// Creates an in-progress game with a fresh id and the current time.
    #[instrument(skip_all, fields(player_one = %player_one, player_two = %player_two))]
    pub fn start(player_one: &PlayerName, player_two: &PlayerName) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_one: player_one.as_str().to_string(),
            player_two: player_two.as_str().to_string(),
            winner: None,
            // Every store round-trips millisecond precision exactly.
            played_at: Utc::now().trunc_subsecs(3),
        }
    }

    /// Rebuilds a finalized game from a stored record.
    pub fn restore(
        id: String,
        player_one: String,
        player_two: String,
        winner: Winner,
        played_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            player_one,
            player_two,
            winner: Some(winner),
            played_at,
        }
    }

    /// Returns the winner, or `None` while the game is in progress.
    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Returns true once the winner is set.
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Returns the name of the player in `seat`.
    pub fn name_of(&self, seat: Seat) -> &str {
        match seat {
            Seat::PlayerOne => &self.player_one,
            Seat::PlayerTwo => &self.player_two,
        }
    }

    /// Returns the persisted label for `winner`: a player name or the draw sentinel.
    pub fn label(&self, winner: Winner) -> &str {
        match winner {
            Winner::Player(seat) => self.name_of(seat),
            Winner::Draw => DRAW_SENTINEL,
        }
    }

    /// Returns the persisted winner label, or `None` while in progress.
    pub fn winner_label(&self) -> Option<&str> {
        self.winner.map(|w| self.label(w))
    }

    /// Maps a persisted winner label back onto this game's seats.
    pub fn parse_label(&self, label: &str) -> Option<Winner> {
        Winner::from_label(label, &self.player_one, &self.player_two)
    }

    /// Sets the winner. Only the session finalizes a game.
    pub(crate) fn finalize(&mut self, winner: Winner) {
        debug_assert!(self.winner.is_none(), "game {} finalized twice", self.id);
        self.winner = Some(winner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn names() -> (PlayerName, PlayerName) {
        (
            PlayerName::parse("Alice").unwrap(),
            PlayerName::parse("Bob").unwrap(),
        )
    }

    #[test]
    fn test_move_parses_words_and_letters() {
        assert_eq!(Move::from_str("rock").unwrap(), Move::Rock);
        assert_eq!(Move::from_str("R").unwrap(), Move::Rock);
        assert_eq!(Move::from_str("Paper").unwrap(), Move::Paper);
        assert_eq!(Move::from_str("p").unwrap(), Move::Paper);
        assert_eq!(Move::from_str("SCISSORS").unwrap(), Move::Scissors);
        assert_eq!(Move::from_str("s").unwrap(), Move::Scissors);
        assert!(Move::from_str("lizard").is_err());
        assert!(Move::from_str("").is_err());
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::Rock.to_string(), "Rock");
        assert_eq!(Move::Scissors.to_string(), "Scissors");
    }

    #[test]
    fn test_beats_is_a_cycle() {
        for mv in Move::iter() {
            assert_ne!(mv.beats(), mv);
            assert_eq!(mv.beats().beats().beats(), mv);
        }
    }

    #[test]
    fn test_start_leaves_winner_unset() {
        let (a, b) = names();
        let game = Game::start(&a, &b);
        assert!(!game.is_finished());
        assert_eq!(game.winner_label(), None);
        assert_eq!(game.player_one(), "Alice");
        assert_eq!(game.player_two(), "Bob");
        assert!(Uuid::parse_str(game.id()).is_ok());
    }

    #[test]
    fn test_start_generates_unique_ids() {
        let (a, b) = names();
        assert_ne!(Game::start(&a, &b).id(), Game::start(&a, &b).id());
    }

    #[test]
    fn test_labels() {
        let (a, b) = names();
        let mut game = Game::start(&a, &b);
        assert_eq!(game.label(Winner::Player(Seat::PlayerTwo)), "Bob");
        assert_eq!(game.label(Winner::Draw), "Draw");

        game.finalize(Winner::Player(Seat::PlayerOne));
        assert_eq!(game.winner_label(), Some("Alice"));
        assert_eq!(game.parse_label("Alice"), Some(Winner::Player(Seat::PlayerOne)));
        assert_eq!(game.parse_label("Bob"), Some(Winner::Player(Seat::PlayerTwo)));
        assert_eq!(game.parse_label("Draw"), Some(Winner::Draw));
        assert_eq!(game.parse_label("Carol"), None);
    }
}
