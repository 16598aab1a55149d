//! Round judging and best-of-three match decisions.

use tracing::instrument;

use super::types::{Move, RoundResult, Seat, Winner};

/// A match never runs past this many rounds.
pub const MAX_ROUNDS: usize = 3;

/// Result of comparing two moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    /// Both players threw the same move.
    Draw,
    /// The first move beats the second.
    FirstWins,
    /// The second move beats the first.
    SecondWins,
}

impl RoundOutcome {
    /// Maps the outcome onto the seats of the table.
    pub fn winner(self) -> Winner {
        match self {
            RoundOutcome::Draw => Winner::Draw,
            RoundOutcome::FirstWins => Winner::Player(Seat::PlayerOne),
            RoundOutcome::SecondWins => Winner::Player(Seat::PlayerTwo),
        }
    }
}

/// Judges one round.
#[instrument(level = "trace")]
pub fn judge(first: Move, second: Move) -> RoundOutcome {
    if first == second {
        RoundOutcome::Draw
    } else if first.beats() == second {
        RoundOutcome::FirstWins
    } else {
        RoundOutcome::SecondWins
    }
}

/// Returns the seat that won both of the first two rounds outright.
///
/// Only meaningful when exactly two rounds have been played.
pub fn early_winner(rounds: &[RoundResult]) -> Option<Seat> {
    match rounds {
        [a, b] => match (a.winner(), b.winner()) {
            (Winner::Player(x), Winner::Player(y)) if x == y => Some(x),
            _ => None,
        },
        _ => None,
    }
}

/// Tallies every round: strictly more round wins takes the match, anything else is a draw.
pub fn match_winner(rounds: &[RoundResult]) -> Winner {
    let (mut one, mut two) = (0usize, 0usize);
    for round in rounds {
        match round.winner() {
            Winner::Player(Seat::PlayerOne) => one += 1,
            Winner::Player(Seat::PlayerTwo) => two += 1,
            Winner::Draw => {}
        }
    }

    match one.cmp(&two) {
        std::cmp::Ordering::Greater => Winner::Player(Seat::PlayerOne),
        std::cmp::Ordering::Less => Winner::Player(Seat::PlayerTwo),
        std::cmp::Ordering::Equal => Winner::Draw,
    }
}

/// Decides whether the match is over after the rounds played so far.
///
/// Two rounds end the match only on a sweep; three rounds always end it.
#[instrument(skip(rounds), fields(rounds = rounds.len()))]
pub fn decide(rounds: &[RoundResult]) -> Option<Winner> {
    match rounds.len() {
        2 => early_winner(rounds).map(Winner::Player),
        MAX_ROUNDS => Some(match_winner(rounds)),
        _ => None,
    }
}
