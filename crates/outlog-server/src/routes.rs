//! HTTP surface
//!
//! Thin glue over the engine. Whole-call failures map to a generic 500
//! with a short static message; internal ledger detail only ever reaches
//! the tracing log.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::error;

use outlog_engine::{EventLogger, EventRecord};

/// Maximum accepted JSON body
const BODY_LIMIT: usize = 2 * 1024 * 1024;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEventRequest {
    #[serde(default)]
    event_data: Option<Value>,
}

#[derive(Debug, Serialize)]
struct LogEventResponse {
    txid: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct LogRecord {
    txid: String,
    message: String,
    timestamp: String,
}

impl From<EventRecord> for LogRecord {
    fn from(record: EventRecord) -> Self {
        Self {
            txid: record.txid.to_string(),
            message: record.message,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
struct RetrieveLogsResponse {
    logs: Vec<LogRecord>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

fn error_body(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Build the application router
pub fn router(logger: Arc<EventLogger>) -> Router {
    Router::new()
        .route("/log-event", post(log_event))
        .route("/retrieve-logs", get(retrieve_logs))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(logger)
}

/// POST /log-event - append one event
async fn log_event(
    State(logger): State<Arc<EventLogger>>,
    Json(request): Json<LogEventRequest>,
) -> Response {
    let Some(Value::Object(event_data)) = request.event_data else {
        return error_body(StatusCode::BAD_REQUEST, "Event data is required");
    };

    match logger.append(event_data).await {
        Ok(receipt) => Json(LogEventResponse {
            txid: receipt.txid.to_string(),
            message: receipt.message,
        })
        .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to log event");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to log event")
        }
    }
}

/// GET /retrieve-logs - reconstruct the full log, newest first
async fn retrieve_logs(State(logger): State<Arc<EventLogger>>) -> Response {
    match logger.list().await {
        Ok(records) => Json(RetrieveLogsResponse {
            logs: records.into_iter().map(LogRecord::from).collect(),
        })
        .into_response(),
        Err(err) => {
            error!(error = %err, "Failed to retrieve logs");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve logs")
        }
    }
}

/// GET /health - liveness check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
