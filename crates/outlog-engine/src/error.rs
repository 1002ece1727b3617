//! Error types for the event log engine

use thiserror::Error;

use outlog_codec::CodecError;
use outlog_core::LedgerError;

/// Errors that fail a whole append or list call.
///
/// Per-candidate decode and parse failures during retrieval never appear
/// here; they are dropped at the aggregation boundary.
#[derive(Debug, Error)]
pub enum EventLogError {
    /// Envelope encoding failed at append time
    #[error("envelope encoding failed: {0}")]
    Codec(#[from] CodecError),

    /// The ledger access capability failed
    #[error("ledger access failed: {0}")]
    Ledger(#[from] LedgerError),

    /// Metadata could not be serialized to JSON
    #[error("metadata serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: EventLogError = CodecError::NoFields.into();
        assert!(matches!(err, EventLogError::Codec(_)));

        let err: EventLogError = LedgerError::funding("empty pool").into();
        assert!(matches!(err, EventLogError::Ledger(_)));
        assert!(format!("{}", err).contains("empty pool"));
    }
}
