//! Error types for ledger access
//!
//! Every [`crate::LedgerAccess`] implementation reports failures through
//! this taxonomy. A whole call either succeeds or fails; there is no
//! partial-success state at this boundary.

use thiserror::Error;

/// Errors a ledger access capability can surface.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Not enough spendable value to fund the requested output
    #[error("funding error: {0}")]
    Funding(String),

    /// The ledger could not be reached or the connection failed mid-call
    #[error("network error: {0}")]
    Network(String),

    /// The ledger refused the request (fee policy, script policy, limits)
    #[error("policy rejection: {0}")]
    Policy(String),

    /// Local I/O failure in a persistent implementation
    #[error("I/O error: {0}")]
    Io(String),

    /// Failed to serialize or deserialize persisted ledger state
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LedgerError {
    /// Create a new Funding error
    pub fn funding(message: impl Into<String>) -> Self {
        Self::Funding(message.into())
    }

    /// Create a new Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Create a new Policy error
    pub fn policy(message: impl Into<String>) -> Self {
        Self::Policy(message.into())
    }

    /// Create a new I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Create a new Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Io(err.to_string())
    }
}

impl From<postcard::Error> for LedgerError {
    fn from(err: postcard::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::funding("no spendable outputs");
        assert!(format!("{}", err).contains("no spendable outputs"));

        let err = LedgerError::network("connection reset");
        assert!(format!("{}", err).contains("network error"));

        let err = LedgerError::policy("dust output");
        assert!(format!("{}", err).contains("policy rejection"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LedgerError = io_err.into();
        assert!(matches!(err, LedgerError::Io(_)));
        assert!(format!("{}", err).contains("file not found"));
    }
}
