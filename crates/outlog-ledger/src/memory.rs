//! In-memory ledger implementation
//!
//! Suitable for tests, simulation, and `--memory` development runs.
//! Nothing survives the process.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use outlog_core::{
    LedgerAccess, LedgerError, LedgerOutput, LedgerTransaction, OutputReceipt, OutputRequest,
    TransactionBundle, Txid,
};

/// In-memory implementation of [`LedgerAccess`].
///
/// Outputs are grouped by basket in insertion order. Besides the trait
/// surface, [`MemoryLedger::seed_transaction`] plants arbitrary
/// transactions into a basket directly, which is how tests simulate
/// foreign or corrupt outputs sharing a collection.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    baskets: DashMap<String, Vec<LedgerTransaction>>,
    sequence: AtomicU64,
}

impl MemoryLedger {
    /// Create an empty in-memory ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant a transaction into a basket without going through
    /// [`LedgerAccess::create_output`].
    ///
    /// The transaction is returned by subsequent scans exactly as given,
    /// including malformed or empty output lists.
    pub fn seed_transaction(&self, basket: &str, transaction: LedgerTransaction) {
        debug!(basket = basket, txid = %transaction.txid.short(), "Seeding transaction");
        self.baskets
            .entry(basket.to_string())
            .or_default()
            .push(transaction);
    }

    /// Number of transactions filed under `basket`
    pub fn transaction_count(&self, basket: &str) -> usize {
        self.baskets.get(basket).map(|txs| txs.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LedgerAccess for MemoryLedger {
    async fn create_output(&self, request: OutputRequest) -> Result<OutputReceipt, LedgerError> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);

        let mut material = Vec::with_capacity(8 + request.locking_script.len());
        material.extend_from_slice(&sequence.to_le_bytes());
        material.extend_from_slice(&request.locking_script);
        let txid = Txid::from_material(&material);

        let transaction = LedgerTransaction::new(
            txid,
            vec![LedgerOutput::new(request.satoshis, request.locking_script)],
        );

        debug!(basket = %request.basket, txid = %txid.short(), "Created output");
        self.baskets
            .entry(request.basket)
            .or_default()
            .push(transaction);

        Ok(OutputReceipt { txid })
    }

    async fn list_outputs(&self, basket: &str) -> Result<TransactionBundle, LedgerError> {
        let transactions = self
            .baskets
            .get(basket)
            .map(|txs| txs.clone())
            .unwrap_or_default();
        Ok(TransactionBundle::new(transactions))
    }
}
