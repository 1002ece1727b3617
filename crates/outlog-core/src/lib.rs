//! # outlog-core
//!
//! Core types, capability traits, and errors for the outlog stack.
//!
//! This crate defines the boundary between the event log engine and the
//! ledger that persists its records: the transaction/output/bundle types
//! that cross it, the [`LedgerAccess`] capability trait, and the
//! [`LedgerError`] taxonomy every implementation reports through.
//!
//! ## Key Types
//!
//! - [`Txid`]: 32-byte transaction identifier, the permanent record handle
//! - [`TransactionBundle`]: self-contained result of a basket scan
//! - [`LedgerAccess`]: the injected ledger wallet capability
//! - [`Clock`]: time abstraction for testability

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::*;
pub use error::*;
pub use traits::*;
pub use types::*;
