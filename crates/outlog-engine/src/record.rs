//! Event log records

use outlog_core::Txid;

/// One reconstructed log record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Handle of the ledger transaction carrying the record
    pub txid: Txid,
    /// The record's message: the stored `message` field when present,
    /// otherwise the raw stored JSON text
    pub message: String,
    /// The stored timestamp string, or a current-time fallback when the
    /// stored metadata carries none
    pub timestamp: String,
}

/// Result of appending one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendReceipt {
    /// Handle of the transaction now carrying the record
    pub txid: Txid,
    /// Static confirmation text; callers identify their record by `txid`
    pub message: String,
}
