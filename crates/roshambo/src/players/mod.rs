//! Move sources for the second seat.

mod random;
mod scripted;

pub use random::RandomMoves;
pub use scripted::ScriptedMoves;

use crate::games::rps::Move;

/// Anything that can throw a move on demand.
pub trait MoveSource: Send {
    /// Produces the next move.
    fn next_move(&mut self) -> Move;

    /// Returns the source's display name.
    fn name(&self) -> &str;
}

impl<T: MoveSource + ?Sized> MoveSource for Box<T> {
    fn next_move(&mut self) -> Move {
        (**self).next_move()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
