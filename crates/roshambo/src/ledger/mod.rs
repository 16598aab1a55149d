//! Ledger-backed history.
//!
//! Games are written as `GameResultEvent`s to an append-only ledger. The
//! [`LedgerClient`] trait is the seam for the ledger itself; [`JsonlLedger`]
//! keeps the chain in a local JSON-lines file.

mod event;
mod jsonl;

pub use event::{
    GameResultEvent, LedgerEntry, Receipt, WINNER_DRAW, WINNER_PLAYER_ONE, WINNER_PLAYER_TWO,
};
pub use jsonl::JsonlLedger;

use tracing::{info, instrument};

use crate::games::rps::Game;
use crate::store::{HistoryStore, StoreError};

/// Append-only event log that game results are written to.
pub trait LedgerClient: Send + Sync {
    /// Appends one event and returns where it landed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the ledger rejects or cannot record the event.
    fn submit(&self, event: &GameResultEvent) -> Result<Receipt, StoreError>;

    /// Returns every entry in ledger order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the ledger cannot be read or fails verification.
    fn events(&self) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// History store that records each finalized game as a ledger event.
///
/// History comes back in ledger (insertion) order.
#[derive(Debug)]
pub struct LedgerHistoryStore<C> {
    client: C,
}

impl<C: LedgerClient> LedgerHistoryStore<C> {
    /// Wraps a ledger client.
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: LedgerClient> HistoryStore for LedgerHistoryStore<C> {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn save(&self, game: &Game) -> Result<(), StoreError> {
        let event = GameResultEvent::encode(game)?;
        let receipt = self.client.submit(&event)?;
        info!(
            sequence = receipt.sequence,
            hash = %receipt.hash,
            "Game result stored on ledger"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch(&self) -> Result<Vec<Game>, StoreError> {
        let entries = self.client.events()?;
        info!(count = entries.len(), "Ledger events loaded");
        entries.into_iter().map(|e| e.event.decode()).collect()
    }

    fn name(&self) -> &str {
        "ledger"
    }
}
