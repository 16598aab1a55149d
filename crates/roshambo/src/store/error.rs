//! History store errors.

use derive_more::{Display, Error};
use tracing::instrument;

/// A game could not be saved to, or read back from, a history store.
///
/// Carries the source location that raised it, so a failed save reported
/// at the console points at the backend call that refused it.
#[derive(Debug, Clone, Display, Error)]
#[display("History store error: {} ({}:{})", message, file, line)]
pub struct StoreError {
    /// What went wrong, in terms of the game or record involved.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// File that raised the error.
    pub file: &'static str,
}

impl StoreError {
    /// Creates an error tagged with the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for StoreError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("game_results query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("cannot open game database: {}", err))
    }
}

impl From<std::io::Error> for StoreError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("history file I/O failed: {}", err))
    }
}

impl From<serde_json::Error> for StoreError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("game result could not be encoded: {}", err))
    }
}
