//! # outlog-ledger
//!
//! [`LedgerAccess`](outlog_core::LedgerAccess) implementations:
//!
//! - [`MemoryLedger`]: in-memory, for tests, simulation, and development
//! - [`FileLedger`]: durable single-node backend with an append-only log
//!   file and tolerant replay
//!
//! Both file new outputs under their basket and return basket scans as
//! self-contained [`TransactionBundle`](outlog_core::TransactionBundle)s.

pub mod file;
pub mod memory;

pub use file::{FileLedger, FileLedgerConfig};
pub use memory::MemoryLedger;
