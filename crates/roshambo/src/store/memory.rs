//! Process-local history store.

use std::sync::Mutex;

use tracing::{debug, instrument};

use super::{HistoryStore, StoreError};
use crate::games::rps::Game;

/// Keeps finalized games in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    games: Mutex<Vec<Game>>,
}

impl InMemoryHistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of games saved so far.
    pub fn len(&self) -> usize {
        self.games.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// Returns true if nothing has been saved.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistoryStore for InMemoryHistoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        if !game.is_finished() {
            return Err(StoreError::new(format!(
                "game {} has no winner yet",
                game.id()
            )));
        }
        let mut games = self
            .games
            .lock()
            .map_err(|_| StoreError::new("history lock poisoned"))?;
        games.push(game.clone());
        debug!(count = games.len(), "Game stored in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch(&self) -> Result<Vec<Game>, StoreError> {
        let games = self
            .games
            .lock()
            .map_err(|_| StoreError::new("history lock poisoned"))?;
        Ok(games.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
