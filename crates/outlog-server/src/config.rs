//! Server configuration
//!
//! Secrets and defaults come from the environment; the CLI overrides the
//! bind address and data directory. Startup fails with an explicit list
//! of missing variables rather than limping along half-configured.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

/// Default HTTP port when PORT is unset
const DEFAULT_PORT: u16 = 3000;
/// Default ledger data directory when OUTLOG_DATA_DIR is unset
const DEFAULT_DATA_DIR: &str = "./data/ledger";

/// Append-only event log persisted as ledger outputs
#[derive(Parser, Debug)]
#[command(name = "outlog-server")]
#[command(about = "HTTP event log server persisting records as ledger outputs")]
#[command(version)]
pub struct Cli {
    /// Address to bind (overrides PORT)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Ledger data directory (overrides OUTLOG_DATA_DIR)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Run on an in-memory ledger; nothing persists
    #[arg(long)]
    pub memory: bool,
}

/// Resolved server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub bind: SocketAddr,
    /// Root secret the envelope keys are derived from
    pub root_secret: [u8; 32],
    /// Data directory for the file-backed ledger
    pub data_dir: PathBuf,
    /// Whether to use the in-memory ledger instead
    pub in_memory: bool,
}

impl ServerConfig {
    /// Resolve configuration from the environment and CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let key_hex = std::env::var("SERVER_PRIVATE_KEY")
            .ok()
            .filter(|value| !value.is_empty());
        let Some(key_hex) = key_hex else {
            bail!("Missing required env vars: SERVER_PRIVATE_KEY");
        };
        let root_secret = parse_root_secret(&key_hex)?;

        let port = match std::env::var("PORT") {
            Ok(value) => value.parse().context("PORT is not a valid port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let bind = cli
            .bind
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], port)));

        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| std::env::var_os("OUTLOG_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Ok(Self {
            bind,
            root_secret,
            data_dir,
            in_memory: cli.memory,
        })
    }
}

/// Parse the 64-hex-char root secret.
fn parse_root_secret(hex_key: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_key.trim()).context("SERVER_PRIVATE_KEY is not valid hex")?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| anyhow::anyhow!("SERVER_PRIVATE_KEY must be 32 bytes (64 hex chars)"))
}
