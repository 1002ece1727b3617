//! # outlog-engine
//!
//! The event log engine: `append` and `list` over an injected
//! [`LedgerAccess`](outlog_core::LedgerAccess) capability plus the
//! envelope codec.
//!
//! Appending wraps the caller's metadata (merged with engine-assigned
//! `timestamp`, `origin`, and `endpoint` fields) into a single-field
//! envelope and files it as a new ledger output. Listing rescans the
//! configured basket and tolerantly reconstructs the log: candidates that
//! fail any decode step are skipped individually, never failing the call.
//!
//! ## Key Types
//!
//! - [`EventLogger`]: the engine
//! - [`LogConfig`]: the log's namespace (protocol tag, key id, basket)
//! - [`EventRecord`] / [`AppendReceipt`]: what callers get back

pub mod config;
pub mod error;
pub mod logger;
pub mod record;

pub use config::LogConfig;
pub use error::EventLogError;
pub use logger::EventLogger;
pub use record::{AppendReceipt, EventRecord};
