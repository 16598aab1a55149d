//! Hash-chained ledger kept in a JSON-lines file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use super::event::{GameResultEvent, LedgerEntry, Receipt};
use super::LedgerClient;
use crate::store::StoreError;

/// Where the next entry goes: its sequence, the hash it links onto, and
/// the byte length of the verified chain before it.
#[derive(Debug)]
struct Head {
    next_sequence: u64,
    last_hash: String,
    committed_len: u64,
}

/// Local append-only ledger: one [`LedgerEntry`] per line.
///
/// The chain is verified on open and on every read, so an edited or
/// dropped line surfaces as a [`StoreError`]. A final line without its
/// newline is an interrupted write; it is ignored on read and cut off
/// before the next append.
#[derive(Debug)]
pub struct JsonlLedger {
    path: PathBuf,
    head: Mutex<Head>,
}

impl JsonlLedger {
    /// Opens the ledger at `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or its chain is broken.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let (entries, committed_len) = read_entries(&path)?;
        let (next_sequence, last_hash) = match entries.last() {
            Some(last) => (last.sequence + 1, last.hash.clone()),
            None => (0, LedgerEntry::GENESIS.to_string()),
        };
        info!(entries = entries.len(), "Ledger opened");

        Ok(Self {
            path,
            head: Mutex::new(Head {
                next_sequence,
                last_hash,
                committed_len,
            }),
        })
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerClient for JsonlLedger {
    /// Appends one entry.
    ///
    /// Anything past the verified chain is cut off first, and a failed
    /// write is rolled back to the same length, so a retry lands at the
    /// same sequence number exactly once.
    #[instrument(skip(self, event), fields(game_id = %event.game_id))]
    fn submit(&self, event: &GameResultEvent) -> Result<Receipt, StoreError> {
        let mut head = self
            .head
            .lock()
            .map_err(|_| StoreError::new("ledger lock poisoned"))?;

        let hash = LedgerEntry::chain_hash(&head.last_hash, head.next_sequence, event)?;
        let entry = LedgerEntry {
            sequence: head.next_sequence,
            prev_hash: head.last_hash.clone(),
            hash: hash.clone(),
            recorded_at: Utc::now(),
            event: event.clone(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let len = file.metadata()?.len();
        if len < head.committed_len {
            return Err(StoreError::new(format!(
                "ledger shrank to {} bytes, expected at least {}",
                len, head.committed_len
            )));
        }
        if len > head.committed_len {
            warn!(
                found = len,
                expected = head.committed_len,
                "Cutting unverified bytes off the ledger tail"
            );
            file.set_len(head.committed_len)?;
        }

        if let Err(e) = file
            .write_all(line.as_bytes())
            .and_then(|()| file.sync_data())
        {
            if let Err(undo) = file.set_len(head.committed_len) {
                warn!(error = %undo, "Could not roll back partial ledger write");
            }
            return Err(e.into());
        }

        let receipt = Receipt {
            sequence: entry.sequence,
            hash,
        };
        head.next_sequence += 1;
        head.last_hash = receipt.hash.clone();
        head.committed_len += line.len() as u64;
        debug!(sequence = receipt.sequence, "Ledger entry appended");
        Ok(receipt)
    }

    #[instrument(skip(self))]
    fn events(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        read_entries(&self.path).map(|(entries, _)| entries)
    }
}

/// Reads and verifies every complete line, returning the entries and the
/// byte length they span. A missing file is an empty ledger.
fn read_entries(path: &Path) -> Result<(Vec<LedgerEntry>, u64), StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
        Err(e) => return Err(e.into()),
    };

    let mut entries = Vec::new();
    let mut prev_hash = LedgerEntry::GENESIS.to_string();
    let mut committed = 0usize;
    for (index, raw) in bytes.split_inclusive(|&b| b == b'\n').enumerate() {
        if !raw.ends_with(b"\n") {
            warn!(bytes = raw.len(), "Ignoring interrupted write at ledger tail");
            break;
        }
        committed += raw.len();

        let line = std::str::from_utf8(raw).map_err(|e| {
            StoreError::new(format!("ledger line {} is not UTF-8: {}", index + 1, e))
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry: LedgerEntry = serde_json::from_str(line).map_err(|e| {
            StoreError::new(format!("ledger line {} is malformed: {}", index + 1, e))
        })?;
        entry.verify(&prev_hash, entries.len() as u64)?;
        prev_hash = entry.hash.clone();
        entries.push(entry);
    }
    Ok((entries, committed as u64))
}
