//! Capability traits
//!
//! The ledger access seam: everything the event log engine needs from the
//! underlying ledger wallet, and nothing else. Signing for spendability,
//! input selection, fee computation, and broadcast all live behind this
//! trait.

use async_trait::async_trait;

use crate::error::LedgerError;
use crate::types::{OutputReceipt, OutputRequest, TransactionBundle};

/// Access to a ledger that can durably persist outputs and later
/// enumerate them by basket.
///
/// `create_output` is atomic from the caller's perspective: it either
/// yields a receipt or fails, however many internal round trips it takes.
/// Implementations own any retry or timeout policy; callers treat a
/// timeout like any other failure.
///
/// Concurrent `create_output` calls funded from a shared pool may race on
/// input selection. Implementations either serialize internally or
/// surface the conflict as an ordinary [`LedgerError`] the caller can
/// retry.
#[async_trait]
pub trait LedgerAccess: Send + Sync {
    /// Persist one new output
    async fn create_output(&self, request: OutputRequest) -> Result<OutputReceipt, LedgerError>;

    /// Return every output filed under `basket`, as a self-contained
    /// bundle of full transactions
    async fn list_outputs(&self, basket: &str) -> Result<TransactionBundle, LedgerError>;
}
