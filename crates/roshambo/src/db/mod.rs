//! SQLite persistence for finalized games.

mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use models::GameRecord;
pub use repository::{MIGRATIONS, SqliteHistoryStore};
