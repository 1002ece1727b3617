use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value, json};

use outlog_codec::{EnvelopeCodec, EnvelopeKey, LockMode, ProtocolTag, SecurityLevel};
use outlog_core::{
    LedgerAccess, LedgerError, LedgerOutput, LedgerTransaction, ManualClock, OutputReceipt,
    OutputRequest, TransactionBundle, Txid,
};
use outlog_engine::{EventLogger, LogConfig};
use outlog_ledger::MemoryLedger;

const ROOT_SECRET: [u8; 32] = [0x42; 32];

fn start_time() -> DateTime<Utc> {
    "2026-03-01T12:00:00Z".parse().unwrap()
}

fn test_logger() -> (EventLogger, Arc<MemoryLedger>, Arc<ManualClock>) {
    let ledger = Arc::new(MemoryLedger::new());
    let clock = Arc::new(ManualClock::new(start_time()));
    let logger = EventLogger::new(ledger.clone(), &ROOT_SECRET, LogConfig::default())
        .with_clock(clock.clone());
    (logger, ledger, clock)
}

fn event(fields: Value) -> Map<String, Value> {
    fields.as_object().cloned().expect("event must be an object")
}

/// Build a valid envelope script carrying an arbitrary payload, the way
/// a foreign writer sharing the basket would.
fn foreign_script(payload: &[u8]) -> Vec<u8> {
    let tag = ProtocolTag::new(SecurityLevel::App, "someone else");
    let key = EnvelopeKey::derive(&[0x99; 32], &tag, "1");
    EnvelopeCodec::new(LockMode::event_log())
        .encode(&[payload.to_vec()], &key)
        .unwrap()
}

// ----------------------------------------------------------------------------
// Append
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_append_returns_static_confirmation() {
    let (logger, ledger, _clock) = test_logger();

    let receipt = logger
        .append(event(json!({"message": "hello"})))
        .await
        .unwrap();

    assert_eq!(receipt.message, "Event logged successfully");
    assert_eq!(ledger.transaction_count("event logs v2"), 1);
}

#[tokio::test]
async fn test_append_files_under_configured_basket() {
    let ledger = Arc::new(MemoryLedger::new());
    let config = LogConfig::default().with_basket("isolated basket");
    let logger = EventLogger::new(ledger.clone(), &ROOT_SECRET, config);

    logger.append(event(json!({"message": "x"}))).await.unwrap();

    assert_eq!(ledger.transaction_count("isolated basket"), 1);
    assert_eq!(ledger.transaction_count("event logs v2"), 0);
}

#[tokio::test]
async fn test_append_failure_propagates() {
    struct BrokeLedger;

    #[async_trait]
    impl LedgerAccess for BrokeLedger {
        async fn create_output(
            &self,
            _request: OutputRequest,
        ) -> Result<OutputReceipt, LedgerError> {
            Err(LedgerError::funding("no spendable outputs"))
        }

        async fn list_outputs(&self, _basket: &str) -> Result<TransactionBundle, LedgerError> {
            Err(LedgerError::network("unreachable"))
        }
    }

    let logger = EventLogger::new(Arc::new(BrokeLedger), &ROOT_SECRET, LogConfig::default());

    let append_err = logger
        .append(event(json!({"message": "x"})))
        .await
        .unwrap_err();
    assert!(append_err.to_string().contains("no spendable outputs"));

    let list_err = logger.list().await.unwrap_err();
    assert!(list_err.to_string().contains("unreachable"));
}

// ----------------------------------------------------------------------------
// Append + list scenarios
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_two_appends_list_newest_first() {
    let (logger, _ledger, clock) = test_logger();

    let first = logger
        .append(event(json!({"message": "hello"})))
        .await
        .unwrap();
    clock.advance(Duration::seconds(5));
    let second = logger
        .append(event(json!({"message": "world"})))
        .await
        .unwrap();

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].txid, second.txid);
    assert_eq!(records[0].message, "world");
    assert_eq!(records[0].timestamp, "2026-03-01T12:00:05.000Z");

    assert_eq!(records[1].txid, first.txid);
    assert_eq!(records[1].message, "hello");
    assert_eq!(records[1].timestamp, "2026-03-01T12:00:00.000Z");
}

#[tokio::test]
async fn test_caller_cannot_forge_timestamp() {
    let (logger, _ledger, _clock) = test_logger();

    logger
        .append(event(json!({
            "message": "backdated",
            "timestamp": "1999-01-01T00:00:00.000Z"
        })))
        .await
        .unwrap();

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].timestamp, "2026-03-01T12:00:00.000Z");
}

#[tokio::test]
async fn test_caller_metadata_overrides_placeholders() {
    let (logger, _ledger, clock) = test_logger();

    logger
        .append(event(json!({"origin": "10.0.0.7", "endpoint": "/custom"})))
        .await
        .unwrap();
    clock.advance(Duration::seconds(1));

    // No message field stored, so the record's message is the raw JSON
    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].message.contains("\"origin\":\"10.0.0.7\""));
    assert!(records[0].message.contains("\"endpoint\":\"/custom\""));
}

#[tokio::test]
async fn test_empty_basket_lists_empty() {
    let (logger, _ledger, _clock) = test_logger();
    assert!(logger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_is_idempotent() {
    let (logger, _ledger, clock) = test_logger();

    for i in 0..5 {
        logger
            .append(event(json!({"message": format!("event {i}")})))
            .await
            .unwrap();
        clock.advance(Duration::milliseconds(250));
    }

    let first = logger.list().await.unwrap();
    let second = logger.list().await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_equal_timestamps_tie_break_deterministically() {
    let (logger, _ledger, _clock) = test_logger();

    // Clock never advances: all five share one timestamp
    let mut txids = Vec::new();
    for i in 0..5 {
        let receipt = logger
            .append(event(json!({"message": format!("event {i}")})))
            .await
            .unwrap();
        txids.push(receipt.txid);
    }

    let records = logger.list().await.unwrap();
    txids.sort();
    let listed: Vec<Txid> = records.iter().map(|record| record.txid).collect();
    assert_eq!(listed, txids);
}

// ----------------------------------------------------------------------------
// Tolerant reconstruction
// ----------------------------------------------------------------------------

#[tokio::test]
async fn test_garbage_outputs_do_not_hide_records() {
    let (logger, ledger, clock) = test_logger();

    logger
        .append(event(json!({"message": "survivor one"})))
        .await
        .unwrap();

    // Interleave assorted junk sharing the basket
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([1; 32]),
            vec![LedgerOutput::new(1, vec![0x17, 0x2a, 0x9c])],
        ),
    );
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(Txid::new([2; 32]), vec![]),
    );
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([3; 32]),
            vec![LedgerOutput::new(1, foreign_script(b"not json at all"))],
        ),
    );

    clock.advance(Duration::seconds(1));
    logger
        .append(event(json!({"message": "survivor two"})))
        .await
        .unwrap();

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].message, "survivor two");
    assert_eq!(records[1].message, "survivor one");
}

#[tokio::test]
async fn test_single_corrupt_record_scenario() {
    let (logger, ledger, _clock) = test_logger();

    logger
        .append(event(json!({"message": "well-formed"})))
        .await
        .unwrap();
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([7; 32]),
            vec![LedgerOutput::new(1, vec![0xde, 0xad, 0xbe])],
        ),
    );

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, "well-formed");
}

#[tokio::test]
async fn test_only_output_zero_is_interpreted() {
    let (logger, ledger, _clock) = test_logger();

    // A valid record envelope hiding at output 1 does not count
    let valid = foreign_script(br#"{"message":"wrong slot","timestamp":"2026-03-01T10:00:00Z"}"#);
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([8; 32]),
            vec![LedgerOutput::new(1, vec![0x00]), LedgerOutput::new(1, valid)],
        ),
    );

    assert!(logger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_all_corrupt_basket_lists_empty() {
    let (logger, ledger, _clock) = test_logger();

    for seed in 0..4u8 {
        ledger.seed_transaction(
            "event logs v2",
            LedgerTransaction::new(
                Txid::new([seed; 32]),
                vec![LedgerOutput::new(1, vec![seed, seed])],
            ),
        );
    }

    assert!(logger.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_timestamp_sorts_last() {
    let (logger, ledger, clock) = test_logger();

    logger
        .append(event(json!({"message": "older"})))
        .await
        .unwrap();
    clock.advance(Duration::seconds(10));
    logger
        .append(event(json!({"message": "newer"})))
        .await
        .unwrap();

    // A decodable record whose stored metadata lacks a timestamp
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([9; 32]),
            vec![LedgerOutput::new(
                1,
                foreign_script(br#"{"message":"undated"}"#),
            )],
        ),
    );

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].message, "newer");
    assert_eq!(records[1].message, "older");
    assert_eq!(records[2].message, "undated");
    // The undated record still reports a fallback timestamp
    assert!(!records[2].timestamp.is_empty());
}

#[tokio::test]
async fn test_message_falls_back_to_raw_json() {
    let (logger, ledger, _clock) = test_logger();

    let payload = br#"{"timestamp":"2026-03-01T09:00:00Z","level":"warn"}"#;
    ledger.seed_transaction(
        "event logs v2",
        LedgerTransaction::new(
            Txid::new([5; 32]),
            vec![LedgerOutput::new(1, foreign_script(payload))],
        ),
    );

    let records = logger.list().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].message, String::from_utf8_lossy(payload));
    assert_eq!(records[0].timestamp, "2026-03-01T09:00:00Z");
}
