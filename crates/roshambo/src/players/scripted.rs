//! Replays a fixed sequence of moves.

use tracing::{instrument, trace};

use super::MoveSource;
use crate::games::rps::Move;

/// Returns pre-set moves in order, wrapping back to the first when exhausted.
///
/// Used for repeatable bot scenarios and tests.
#[derive(Debug, Clone)]
pub struct ScriptedMoves {
    name: String,
    moves: Vec<Move>,
    cursor: usize,
}

impl ScriptedMoves {
    /// Creates a script. Returns `None` if `moves` is empty.
    #[instrument(skip_all)]
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = Move>) -> Option<Self> {
        let moves: Vec<Move> = moves.into_iter().collect();
        if moves.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            moves,
            cursor: 0,
        })
    }

    /// Index of the move returned by the next call.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self) -> Move {
        let mv = self.moves[self.cursor];
        self.cursor = (self.cursor + 1) % self.moves.len();
        trace!(bot = %self.name, %mv, cursor = self.cursor, "Scripted move");
        mv
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rps::Move::{Paper, Rock, Scissors};

    #[test]
    fn test_empty_script_rejected() {
        assert!(ScriptedMoves::new("Bot", []).is_none());
    }

    #[test]
    fn test_replays_in_order_and_wraps() {
        let mut script = ScriptedMoves::new("Bot", [Rock, Paper, Scissors]).unwrap();
        let played: Vec<_> = (0..7).map(|_| script.next_move()).collect();
        assert_eq!(played, [Rock, Paper, Scissors, Rock, Paper, Scissors, Rock]);
        assert_eq!(script.cursor(), 1);
    }

    #[test]
    fn test_single_move_repeats() {
        let mut script = ScriptedMoves::new("Bot", [Paper]).unwrap();
        assert_eq!(script.next_move(), Paper);
        assert_eq!(script.next_move(), Paper);
        assert_eq!(script.cursor(), 0);
    }
}
