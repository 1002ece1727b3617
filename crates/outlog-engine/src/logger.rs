//! Append and retrieval over an injected ledger capability
//!
//! `append` wraps caller metadata in a single-field envelope and files it
//! as a new ledger output. `list` rebuilds the whole log from a basket
//! scan, dropping any candidate that fails to decode or parse: baskets
//! accumulate outputs from other protocol versions, other applications,
//! and crashed writes, and one bad record must never hide the rest.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};

use outlog_codec::{EnvelopeCodec, EnvelopeKey, LockMode};
use outlog_core::{Clock, LedgerAccess, OutputRequest, SystemClock};

use crate::config::LogConfig;
use crate::error::EventLogError;
use crate::record::{AppendReceipt, EventRecord};

/// Endpoint placeholder stored in every record's metadata
const ENDPOINT: &str = "/log-event";
/// Origin placeholder until request attribution exists
const ORIGIN: &str = "unknown";
/// Static confirmation returned by every successful append
const APPEND_CONFIRMATION: &str = "Event logged successfully";

/// The event log engine.
///
/// Holds no state between calls: every `list` rescans the basket from the
/// ledger. Concurrent appends are not serialized here; funding conflicts
/// surface as ordinary [`EventLogError::Ledger`] failures.
pub struct EventLogger {
    ledger: Arc<dyn LedgerAccess>,
    codec: EnvelopeCodec,
    key: EnvelopeKey,
    config: LogConfig,
    clock: Arc<dyn Clock>,
}

impl EventLogger {
    /// Create an engine over `ledger`, deriving the envelope key for
    /// `config`'s protocol tag and key id from `root_secret`.
    pub fn new(ledger: Arc<dyn LedgerAccess>, root_secret: &[u8; 32], config: LogConfig) -> Self {
        let key = EnvelopeKey::derive(root_secret, &config.protocol, &config.key_id);
        Self {
            ledger,
            codec: EnvelopeCodec::new(LockMode::event_log()),
            key,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock (deterministic tests)
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The engine's configuration
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    fn now_rfc3339(&self) -> String {
        self.clock
            .now_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Append one event to the log.
    ///
    /// Caller keys override the `origin`/`endpoint` placeholders, but the
    /// `timestamp` is always engine-assigned: it is the record's sort key
    /// and must not be forgeable.
    pub async fn append(
        &self,
        event_data: Map<String, Value>,
    ) -> Result<AppendReceipt, EventLogError> {
        let timestamp = self.now_rfc3339();

        let mut metadata = Map::new();
        metadata.insert("origin".to_string(), Value::String(ORIGIN.to_string()));
        metadata.insert("endpoint".to_string(), Value::String(ENDPOINT.to_string()));
        for (key, value) in event_data {
            metadata.insert(key, value);
        }
        metadata.insert("timestamp".to_string(), Value::String(timestamp));

        let payload = serde_json::to_vec(&Value::Object(metadata))?;
        let script = self.codec.encode(&[payload], &self.key)?;

        let receipt = self
            .ledger
            .create_output(OutputRequest {
                locking_script: script,
                satoshis: self.config.satoshis,
                basket: self.config.basket.clone(),
                tags: self.config.tags.clone(),
                description: self.config.description.clone(),
            })
            .await?;

        info!(txid = %receipt.txid.short(), "Event logged");
        Ok(AppendReceipt {
            txid: receipt.txid,
            message: APPEND_CONFIRMATION.to_string(),
        })
    }

    /// Reconstruct the full log, newest first.
    ///
    /// Every transaction in the basket is a candidate; candidates that
    /// lack an output 0, fail envelope decode, or fail JSON parse are
    /// skipped with a debug line. An empty basket, or one where every
    /// candidate is skipped, yields an empty vector.
    pub async fn list(&self) -> Result<Vec<EventRecord>, EventLogError> {
        let bundle = self.ledger.list_outputs(&self.config.basket).await?;
        debug!(
            basket = %self.config.basket,
            candidates = bundle.len(),
            "Scanning basket"
        );

        let mut entries: Vec<(Option<DateTime<Utc>>, EventRecord)> = Vec::new();
        for tx in bundle.transactions() {
            // Only output 0 carries a record; later outputs belong to the
            // wallet (change etc.).
            let Some(output) = tx.output(0) else {
                debug!(txid = %tx.txid.short(), "No output 0, skipping");
                continue;
            };
            let envelope = match self.codec.decode(&output.locking_script) {
                Ok(envelope) => envelope,
                Err(err) => {
                    debug!(txid = %tx.txid.short(), error = %err, "Undecodable script, skipping");
                    continue;
                }
            };
            let Some(payload) = envelope.fields.first() else {
                continue;
            };
            let metadata: Value = match serde_json::from_slice(payload) {
                Ok(value) => value,
                Err(err) => {
                    debug!(txid = %tx.txid.short(), error = %err, "Unparseable payload, skipping");
                    continue;
                }
            };

            let message = match metadata.get("message").and_then(Value::as_str) {
                Some(message) => message.to_string(),
                None => String::from_utf8_lossy(payload).into_owned(),
            };
            let stored_timestamp = metadata
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string);
            let sort_key = stored_timestamp
                .as_deref()
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|parsed| parsed.with_timezone(&Utc));
            let timestamp = stored_timestamp.unwrap_or_else(|| self.now_rfc3339());

            entries.push((
                sort_key,
                EventRecord {
                    txid: tx.txid,
                    message,
                    timestamp,
                },
            ));
        }

        // Newest first. A record without a parseable stored timestamp
        // sorts after every dated record rather than floating to the
        // front on its fallback; ties order by txid so repeated scans
        // agree.
        entries.sort_by(|(key_a, record_a), (key_b, record_b)| {
            key_b
                .cmp(key_a)
                .then_with(|| record_a.txid.cmp(&record_b.txid))
        });

        Ok(entries.into_iter().map(|(_, record)| record).collect())
    }
}

impl std::fmt::Debug for EventLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLogger")
            .field("config", &self.config)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
