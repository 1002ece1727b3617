//! File-backed ledger implementation
//!
//! A durable single-node backend: every created output is appended to a
//! log file as a length-prefixed postcard entry, and opening the ledger
//! replays the file to rebuild the basket index. Replay tolerates a
//! truncated tail (e.g. from a crash mid-append) by keeping everything
//! before the first short or corrupt entry.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use outlog_core::{
    LedgerAccess, LedgerError, LedgerOutput, LedgerTransaction, OutputReceipt, OutputRequest,
    TransactionBundle, Txid,
};

/// Largest entry accepted during replay; anything bigger is treated as
/// corruption.
const MAX_ENTRY_LEN: usize = 16 * 1024 * 1024;

/// Configuration for a file-backed ledger
#[derive(Debug, Clone)]
pub struct FileLedgerConfig {
    /// Directory holding the ledger log file
    pub base_dir: PathBuf,
    /// Whether to sync writes to disk immediately
    pub sync_on_write: bool,
}

impl Default for FileLedgerConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./data/ledger"),
            sync_on_write: true,
        }
    }
}

/// One persisted entry: the transaction plus the filing metadata needed
/// to rebuild the basket index on replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LedgerEntry {
    sequence: u64,
    basket: String,
    tags: Vec<String>,
    description: String,
    transaction: LedgerTransaction,
}

/// File-backed implementation of [`LedgerAccess`].
///
/// Appends serialize through the log file lock, so concurrent
/// `create_output` calls cannot interleave partial writes.
pub struct FileLedger {
    config: FileLedgerConfig,
    log_path: PathBuf,
    file: RwLock<File>,
    /// basket -> txids in insertion order
    baskets: DashMap<String, Vec<Txid>>,
    /// txid -> full transaction
    transactions: DashMap<Txid, LedgerTransaction>,
    sequence: AtomicU64,
}

impl FileLedger {
    /// Open (or create) the ledger under `config.base_dir`, replaying any
    /// existing log to rebuild the index.
    pub async fn open(config: FileLedgerConfig) -> Result<Self, LedgerError> {
        tokio::fs::create_dir_all(&config.base_dir).await?;

        let log_path = config.base_dir.join("outputs.log");
        info!(path = %log_path.display(), "Opening ledger log");

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&log_path)
            .await?;

        let baskets = DashMap::new();
        let transactions = DashMap::new();
        let next_sequence =
            Self::replay(&file, &log_path, &baskets, &transactions).await?;

        Ok(Self {
            config,
            log_path,
            file: RwLock::new(file),
            baskets,
            transactions,
            sequence: AtomicU64::new(next_sequence),
        })
    }

    /// Path of the underlying log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Number of transactions restored or written so far
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Replay the log to rebuild the in-memory index, returning the next
    /// sequence number. Stops (without failing) at the first truncated or
    /// corrupt entry.
    async fn replay(
        file: &File,
        log_path: &Path,
        baskets: &DashMap<String, Vec<Txid>>,
        transactions: &DashMap<Txid, LedgerTransaction>,
    ) -> Result<u64, LedgerError> {
        let file_size = file.metadata().await?.len();
        if file_size == 0 {
            return Ok(0);
        }

        let mut reader = BufReader::new(file.try_clone().await?);
        let mut next_sequence = 0u64;
        let mut offset = 0u64;

        while offset < file_size {
            let mut len_buf = [0u8; 4];
            if reader.read_exact(&mut len_buf).await.is_err() {
                warn!(offset = offset, "Truncated entry header, stopping replay");
                break;
            }
            let entry_len = u32::from_be_bytes(len_buf) as usize;
            if entry_len == 0 || entry_len > MAX_ENTRY_LEN {
                warn!(offset = offset, len = entry_len, "Invalid entry length, stopping replay");
                break;
            }

            let mut entry_buf = vec![0u8; entry_len];
            if reader.read_exact(&mut entry_buf).await.is_err() {
                warn!(offset = offset, "Truncated entry body, stopping replay");
                break;
            }

            match postcard::from_bytes::<LedgerEntry>(&entry_buf) {
                Ok(entry) => {
                    next_sequence = next_sequence.max(entry.sequence + 1);
                    baskets
                        .entry(entry.basket)
                        .or_default()
                        .push(entry.transaction.txid);
                    transactions.insert(entry.transaction.txid, entry.transaction);
                }
                Err(err) => {
                    warn!(offset = offset, error = %err, "Corrupt entry, stopping replay");
                    break;
                }
            }

            offset += 4 + entry_len as u64;
        }

        info!(
            path = %log_path.display(),
            transactions = transactions.len(),
            "Replayed ledger log"
        );
        Ok(next_sequence)
    }

    async fn write_entry(&self, entry: &LedgerEntry) -> Result<(), LedgerError> {
        let serialized = postcard::to_allocvec(entry)?;
        let len_bytes = (serialized.len() as u32).to_be_bytes();

        let mut file = self.file.write().await;
        file.seek(SeekFrom::End(0)).await?;
        file.write_all(&len_bytes).await?;
        file.write_all(&serialized).await?;
        if self.config.sync_on_write {
            file.sync_data().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerAccess for FileLedger {
    async fn create_output(&self, request: OutputRequest) -> Result<OutputReceipt, LedgerError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);

        let mut hasher = blake3::Hasher::new();
        hasher.update(&sequence.to_le_bytes());
        hasher.update(request.basket.as_bytes());
        hasher.update(&request.locking_script);
        let txid = Txid::new(*hasher.finalize().as_bytes());

        let transaction = LedgerTransaction::new(
            txid,
            vec![LedgerOutput::new(
                request.satoshis,
                request.locking_script,
            )],
        );

        let entry = LedgerEntry {
            sequence,
            basket: request.basket.clone(),
            tags: request.tags,
            description: request.description,
            transaction: transaction.clone(),
        };
        self.write_entry(&entry).await?;

        self.baskets
            .entry(request.basket)
            .or_default()
            .push(txid);
        self.transactions.insert(txid, transaction);

        debug!(sequence = sequence, txid = %txid.short(), "Appended output");
        Ok(OutputReceipt { txid })
    }

    async fn list_outputs(&self, basket: &str) -> Result<TransactionBundle, LedgerError> {
        let txids: Vec<Txid> = match self.baskets.get(basket) {
            Some(txids) => txids.clone(),
            None => return Ok(TransactionBundle::default()),
        };

        let transactions: Vec<LedgerTransaction> = txids
            .iter()
            .filter_map(|txid| self.transactions.get(txid).map(|tx| tx.clone()))
            .collect();
        Ok(TransactionBundle::new(transactions))
    }
}
