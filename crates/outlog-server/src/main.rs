//! outlog server
//!
//! HTTP event log whose records are persisted as ledger outputs.
//!
//! ## Usage
//!
//! ```bash
//! # Durable, file-backed ledger under ./data/ledger
//! SERVER_PRIVATE_KEY=<64 hex chars> outlog-server
//!
//! # Ephemeral in-memory ledger on a custom port
//! SERVER_PRIVATE_KEY=<64 hex chars> outlog-server --memory --bind 127.0.0.1:8080
//! ```

mod config;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use outlog_core::LedgerAccess;
use outlog_engine::{EventLogger, LogConfig};
use outlog_ledger::{FileLedger, FileLedgerConfig, MemoryLedger};

use config::{Cli, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("outlog_server=info".parse().expect("valid directive"))
                .add_directive("outlog_engine=info".parse().expect("valid directive"))
                .add_directive("outlog_ledger=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli)?;

    let ledger: Arc<dyn LedgerAccess> = if config.in_memory {
        info!("Using in-memory ledger; nothing will persist");
        Arc::new(MemoryLedger::new())
    } else {
        let ledger = FileLedger::open(FileLedgerConfig {
            base_dir: config.data_dir.clone(),
            sync_on_write: true,
        })
        .await
        .context("Failed to open ledger data directory")?;
        Arc::new(ledger)
    };

    let logger = Arc::new(EventLogger::new(ledger, &config.root_secret, LogConfig::default()));
    let app = routes::router(logger);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "Logger server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
