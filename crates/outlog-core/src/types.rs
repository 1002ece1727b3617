//! Ledger-facing types
//!
//! Transactions, outputs, and the self-contained bundle a basket scan
//! returns. These are the wire shapes shared between the event log engine
//! and every ledger access implementation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Unique identifier of a ledger transaction.
///
/// The permanent external handle for anything stored in one of the
/// transaction's outputs. Rendered as 64 hex chars in user-facing
/// surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Txid(pub [u8; 32]);

impl Txid {
    /// Create a txid from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive a txid by hashing arbitrary material
    pub fn from_material(material: &[u8]) -> Self {
        Self(*blake3::hash(material).as_bytes())
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from a 64-char hex string
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        Self::from_slice(&bytes)
    }

    /// Create from a slice (must be 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 32 {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Short display form (first 4 bytes hex)
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl Display for Txid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Txid {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// One output of a ledger transaction: a value and a locking script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerOutput {
    /// Value carried by the output, in the ledger's minimal unit
    pub satoshis: u64,
    /// The opaque locking condition; data-carrying protocols overload this
    pub locking_script: Vec<u8>,
}

impl LedgerOutput {
    /// Create a new output
    pub fn new(satoshis: u64, locking_script: Vec<u8>) -> Self {
        Self {
            satoshis,
            locking_script,
        }
    }
}

/// A ledger transaction with its full output list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    /// The transaction's unique identifier
    pub txid: Txid,
    /// All outputs, in index order
    pub outputs: Vec<LedgerOutput>,
}

impl LedgerTransaction {
    /// Create a new transaction
    pub fn new(txid: Txid, outputs: Vec<LedgerOutput>) -> Self {
        Self { txid, outputs }
    }

    /// Get an output by index
    pub fn output(&self, index: usize) -> Option<&LedgerOutput> {
        self.outputs.get(index)
    }
}

/// A self-contained set of transactions returned by a basket scan.
///
/// Carries the full transactions so every output's locking script can be
/// inspected without further round trips. Supports enumeration and random
/// access by txid, plus a compact binary form for shipping the whole
/// bundle as one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBundle {
    transactions: Vec<LedgerTransaction>,
}

impl TransactionBundle {
    /// Create a bundle from a transaction list
    pub fn new(transactions: Vec<LedgerTransaction>) -> Self {
        Self { transactions }
    }

    /// Add a transaction to the bundle
    pub fn push(&mut self, transaction: LedgerTransaction) {
        self.transactions.push(transaction);
    }

    /// Enumerate the contained transactions
    pub fn transactions(&self) -> impl Iterator<Item = &LedgerTransaction> {
        self.transactions.iter()
    }

    /// Look up a transaction by its txid
    pub fn find_transaction(&self, txid: &Txid) -> Option<&LedgerTransaction> {
        self.transactions.iter().find(|tx| tx.txid == *txid)
    }

    /// Number of transactions in the bundle
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the bundle is empty
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Serialize to the compact binary form
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        Ok(postcard::to_allocvec(self)?)
    }

    /// Deserialize from the compact binary form
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Request to persist one new data-carrying output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRequest {
    /// The locking script embedding the data
    pub locking_script: Vec<u8>,
    /// Value for the output, in the ledger's minimal unit
    pub satoshis: u64,
    /// Collection the output is filed under for later scans
    pub basket: String,
    /// Free-form tags attached to the output
    pub tags: Vec<String>,
    /// Human-readable description of the action
    pub description: String,
}

/// Receipt for a persisted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReceipt {
    /// Identifier of the transaction now carrying the output
    pub txid: Txid,
}
