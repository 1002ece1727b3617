//! Event log configuration
//!
//! The protocol tag, key id, and basket name form the log's namespace on
//! the ledger: re-running a deployment with the same configuration keeps
//! seeing its own prior records. They are injected rather than ambient so
//! tests can run isolated namespaces side by side.

use outlog_codec::{ProtocolTag, SecurityLevel};

/// Configuration for one event log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Protocol tag the envelope keys are derived under
    pub protocol: ProtocolTag,
    /// Key identifier within the protocol
    pub key_id: String,
    /// Basket (collection) the log's outputs are filed under
    pub basket: String,
    /// Tags attached to every created output
    pub tags: Vec<String>,
    /// Value carried by each output, in the ledger's minimal unit
    pub satoshis: u64,
    /// Description attached to every created output
    pub description: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            protocol: ProtocolTag::new(SecurityLevel::App, "event logger"),
            key_id: "1".to_string(),
            basket: "event logs v2".to_string(),
            tags: vec!["eventlog".to_string()],
            satoshis: 1,
            description: "log-event".to_string(),
        }
    }
}

impl LogConfig {
    /// Override the basket, keeping everything else
    pub fn with_basket(mut self, basket: impl Into<String>) -> Self {
        self.basket = basket.into();
        self
    }
}
