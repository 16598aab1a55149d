//! Diesel-backed history store.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{GameRecord, schema};
use crate::games::rps::Game;
use crate::store::{HistoryStore, StoreError};

/// Schema migrations, applied when a store is opened.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Stores finalized games in a SQLite file.
///
/// Each operation opens its own connection, so the store is cheap to clone
/// and safe to share between threads.
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    db_path: String,
}

impl SqliteHistoryStore {
    /// Opens (creating if needed) the database at `db_path` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, StoreError> {
        info!(path = %db_path, "Opening SQLite history store");
        let store = Self { db_path };
        let mut conn = store.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::new(format!("Migration failed: {}", e)))?;
        debug!(applied = applied.len(), "Migrations applied");
        Ok(store)
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, StoreError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            StoreError::new(format!("Failed to connect to '{}': {}", self.db_path, e))
        })
    }
}

impl HistoryStore for SqliteHistoryStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        let record = GameRecord::from_game(game)?;
        let mut conn = self.connection()?;

        diesel::insert_into(schema::game_results::table)
            .values(&record)
            .execute(&mut conn)?;

        info!(winner = %record.winner(), "Game result recorded");
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch(&self) -> Result<Vec<Game>, StoreError> {
        let mut conn = self.connection()?;

        let records = schema::game_results::table
            .order((
                schema::game_results::played_at.desc(),
                schema::game_results::id.desc(),
            ))
            .select(GameRecord::as_select())
            .load::<GameRecord>(&mut conn)?;

        info!(count = records.len(), "Game history loaded");
        records.into_iter().map(GameRecord::into_game).collect()
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
