//! Game history persistence.
//!
//! The session logic only sees [`HistoryStore`]; which backend sits behind
//! it is decided at startup from [`AppConfig`].

mod error;
mod memory;

pub use error::StoreError;
pub use memory::InMemoryHistoryStore;

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{AppConfig, StorageKind};
use crate::db::SqliteHistoryStore;
use crate::games::rps::Game;
use crate::ledger::{JsonlLedger, LedgerHistoryStore};

/// Persists finalized games and reads them back.
///
/// Ordering of [`fetch`](HistoryStore::fetch) is the backend's choice:
/// SQLite returns most recent first, the other stores return insertion order.
pub trait HistoryStore: Send + Sync {
    /// Persists one finalized game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the game is unfinished or the backend rejects it.
    fn save(&self, game: &Game) -> Result<(), StoreError>;

    /// Returns every stored game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read or holds a malformed record.
    fn fetch(&self) -> Result<Vec<Game>, StoreError>;

    /// Short backend name for logs.
    fn name(&self) -> &str;
}

impl<T: HistoryStore + ?Sized> HistoryStore for Box<T> {
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        (**self).save(game)
    }

    fn fetch(&self) -> Result<Vec<Game>, StoreError> {
        (**self).fetch()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        (**self).save(game)
    }

    fn fetch(&self) -> Result<Vec<Game>, StoreError> {
        (**self).fetch()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Opens the backend selected by `config`, creating the data directory if needed.
///
/// # Errors
///
/// Returns [`StoreError`] if the directory, database, or ledger file cannot be opened.
#[instrument(skip(config), fields(storage = %config.storage()))]
pub fn open_store(config: &AppConfig) -> Result<Box<dyn HistoryStore>, StoreError> {
    let store: Box<dyn HistoryStore> = match config.storage() {
        StorageKind::Sqlite => {
            std::fs::create_dir_all(config.data_dir())?;
            let path = config.database_path();
            let path = path
                .to_str()
                .ok_or_else(|| StoreError::new(format!("non UTF-8 path: {}", path.display())))?;
            Box::new(SqliteHistoryStore::open(path.to_string())?)
        }
        StorageKind::Ledger => Box::new(LedgerHistoryStore::new(JsonlLedger::open(
            config.ledger_path(),
        )?)),
        StorageKind::Memory => Box::new(InMemoryHistoryStore::new()),
    };
    info!(backend = store.name(), "History store ready");
    Ok(store)
}
