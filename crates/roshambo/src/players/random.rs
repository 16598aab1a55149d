//! Pseudo-random bot opponent.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

use super::MoveSource;
use crate::games::rps::Move;

/// Picks uniformly among the three moves.
///
/// Not suitable where unpredictability matters; the seed is the clock.
#[derive(Debug)]
pub struct RandomMoves {
    name: String,
    rng: StdRng,
}

impl RandomMoves {
    /// Creates a source seeded from the system clock's nanoseconds.
    #[instrument(skip(name))]
    pub fn new(name: impl Into<String>) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        Self::with_seed(name, seed)
    }

    /// Creates a reproducible source.
    #[instrument(skip(name))]
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        let name = name.into();
        debug!(bot = %name, seed, "Seeding random move source");
        Self {
            name,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MoveSource for RandomMoves {
    fn next_move(&mut self) -> Move {
        let mv = Move::ALL[self.rng.gen_range(0..Move::ALL.len())];
        debug!(bot = %self.name, %mv, "Bot chose move");
        mv
    }

    fn name(&self) -> &str {
        &self.name
    }
}
