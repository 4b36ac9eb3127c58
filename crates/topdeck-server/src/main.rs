//! topdeck server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the marketplace API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use clap::Parser;
use serde::Deserialize;
use tokio::net::TcpListener;
use topdeck_store_sqlite::{PoolConfig, SqliteMarket};
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Topdeck marketplace server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` with
/// `TOPDECK_*` environment overrides.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  store_path: PathBuf,
  #[serde(default)]
  pool:       PoolSettings,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8087
}

#[derive(Deserialize, Clone)]
struct PoolSettings {
  #[serde(default = "default_min_connections")]
  min_connections:    usize,
  #[serde(default = "default_max_connections")]
  max_connections:    usize,
  #[serde(default = "default_timeout_ms")]
  acquire_timeout_ms: u64,
  #[serde(default = "default_timeout_ms")]
  busy_timeout_ms:    u64,
}

fn default_min_connections() -> usize {
  1
}

fn default_max_connections() -> usize {
  20
}

fn default_timeout_ms() -> u64 {
  5_000
}

impl Default for PoolSettings {
  fn default() -> Self {
    Self {
      min_connections:    default_min_connections(),
      max_connections:    default_max_connections(),
      acquire_timeout_ms: default_timeout_ms(),
      busy_timeout_ms:    default_timeout_ms(),
    }
  }
}

impl From<PoolSettings> for PoolConfig {
  fn from(settings: PoolSettings) -> Self {
    PoolConfig {
      min_connections: settings.min_connections,
      max_connections: settings.max_connections,
      acquire_timeout: Duration::from_millis(settings.acquire_timeout_ms),
      busy_timeout:    Duration::from_millis(settings.busy_timeout_ms),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TOPDECK").separator("__"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open the SQLite-backed market.
  let market = SqliteMarket::open(&store_path, server_cfg.pool.clone().into())
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let app = topdeck_api::api_router(Arc::new(market.clone()))
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  market.close().await;

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for shutdown signal: {e}");
  }
  tracing::info!("Shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
