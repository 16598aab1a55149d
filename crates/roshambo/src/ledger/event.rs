//! Ledger event encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::games::rps::{Game, Seat, Winner};
use crate::store::StoreError;

/// Winner code for a drawn game.
pub const WINNER_DRAW: u8 = 0;
/// Winner code for player one.
pub const WINNER_PLAYER_ONE: u8 = 1;
/// Winner code for player two.
pub const WINNER_PLAYER_TWO: u8 = 2;

/// A finalized game as written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResultEvent {
    /// Id of the game.
    pub game_id: String,
    /// Name of player one.
    pub player1: String,
    /// Name of player two.
    pub player2: String,
    /// [`WINNER_DRAW`], [`WINNER_PLAYER_ONE`] or [`WINNER_PLAYER_TWO`].
    pub winner: u8,
    /// When the game was played.
    pub played_at: DateTime<Utc>,
}

impl GameResultEvent {
    /// Encodes a finalized game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the game has no winner yet.
    pub fn encode(game: &Game) -> Result<Self, StoreError> {
        let winner = match game.winner() {
            Some(Winner::Draw) => WINNER_DRAW,
            Some(Winner::Player(Seat::PlayerOne)) => WINNER_PLAYER_ONE,
            Some(Winner::Player(Seat::PlayerTwo)) => WINNER_PLAYER_TWO,
            None => {
                return Err(StoreError::new(format!(
                    "game {} has no winner yet",
                    game.id()
                )));
            }
        };
        Ok(Self {
            game_id: game.id().clone(),
            player1: game.player_one().clone(),
            player2: game.player_two().clone(),
            winner,
            played_at: *game.played_at(),
        })
    }

    /// Decodes back into a finalized game.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on an unknown winner code.
    pub fn decode(self) -> Result<Game, StoreError> {
        let winner = match self.winner {
            WINNER_DRAW => Winner::Draw,
            WINNER_PLAYER_ONE => Winner::Player(Seat::PlayerOne),
            WINNER_PLAYER_TWO => Winner::Player(Seat::PlayerTwo),
            code => {
                return Err(StoreError::new(format!(
                    "game {} has unknown winner code {}",
                    self.game_id, code
                )));
            }
        };
        Ok(Game::restore(
            self.game_id,
            self.player1,
            self.player2,
            winner,
            self.played_at,
        ))
    }
}

/// One link of the ledger chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the ledger, starting at zero.
    pub sequence: u64,
    /// Hash of the previous entry ([`LedgerEntry::GENESIS`] for the first).
    pub prev_hash: String,
    /// SHA-256 over the previous hash, sequence and event.
    pub hash: String,
    /// When the ledger accepted the entry.
    pub recorded_at: DateTime<Utc>,
    /// The recorded game.
    pub event: GameResultEvent,
}

impl LedgerEntry {
    /// Previous-hash value of the first entry.
    pub const GENESIS: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";

    /// Computes the hash linking `event` at `sequence` onto `prev_hash`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the event cannot be serialized.
    pub fn chain_hash(
        prev_hash: &str,
        sequence: u64,
        event: &GameResultEvent,
    ) -> Result<String, StoreError> {
        let mut hasher = Sha256::new();
        hasher.update(prev_hash.as_bytes());
        hasher.update(sequence.to_be_bytes());
        hasher.update(serde_json::to_vec(event)?);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Checks that this entry follows `prev_hash` at `sequence` and its hash is intact.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] describing the first broken link.
    pub fn verify(&self, prev_hash: &str, sequence: u64) -> Result<(), StoreError> {
        if self.sequence != sequence {
            return Err(StoreError::new(format!(
                "ledger entry out of order: expected {}, found {}",
                sequence, self.sequence
            )));
        }
        if self.prev_hash != prev_hash {
            return Err(StoreError::new(format!(
                "ledger entry {} does not link to its predecessor",
                self.sequence
            )));
        }
        if Self::chain_hash(prev_hash, sequence, &self.event)? != self.hash {
            return Err(StoreError::new(format!(
                "ledger entry {} hash mismatch",
                self.sequence
            )));
        }
        Ok(())
    }
}

/// Where a submitted event landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Sequence number of the new entry.
    pub sequence: u64,
    /// Hash of the new entry.
    pub hash: String,
}
