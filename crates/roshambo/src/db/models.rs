//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;
use crate::games::rps::{Game, Winner};
use crate::store::StoreError;

/// One row of `game_results`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, Getters, new)]
#[diesel(table_name = schema::game_results)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GameRecord {
    id: String,
    player1: String,
    player2: String,
    winner: String,
    played_at: NaiveDateTime,
}

impl GameRecord {
    /// Flattens a finalized game into a row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the game has no winner yet.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, StoreError> {
        let winner = game
            .winner_label()
            .ok_or_else(|| StoreError::new(format!("game {} has no winner yet", game.id())))?;
        Ok(Self::new(
            game.id().clone(),
            game.player_one().clone(),
            game.player_two().clone(),
            winner.to_string(),
            game.played_at().naive_utc(),
        ))
    }

    /// Rebuilds the game this row was written from.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the winner names neither player nor the draw sentinel.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn into_game(self) -> Result<Game, StoreError> {
        let winner = Winner::from_label(&self.winner, &self.player1, &self.player2)
            .ok_or_else(|| {
                StoreError::new(format!(
                    "game {} has unknown winner '{}'",
                    self.id, self.winner
                ))
            })?;
        Ok(Game::restore(
            self.id,
            self.player1,
            self.player2,
            winner,
            self.played_at.and_utc(),
        ))
    }
}
