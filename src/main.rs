//! Travel agency CMS backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    travel-cms                     │
//!   Visitor           │   ┌──────────┐   ┌──────────────┐                 │
//!   ──────────────────┼──▶│  public  │──▶│ rate limiter │──┐              │
//!                     │   └──────────┘   └──────────────┘  │  ┌────────┐  │
//!                     │                                     ├─▶│ store  │  │
//!   Editor (Bearer)   │   ┌──────────┐   ┌──────────────┐  │  └────────┘  │
//!   ──────────────────┼──▶│  admin   │──▶│  auth gate   │──┘      │       │
//!                     │   └──────────┘   └──────────────┘         ▼       │
//!                     │                                     JSON snapshot │
//!                     │  config (TOML, hot reload) · tracing · metrics    │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use travel_cms::config::loader::load_config;
use travel_cms::config::watcher::ConfigWatcher;
use travel_cms::observability::{logging, metrics};
use travel_cms::{CmsConfig, ContentStore, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "travel-cms")]
#[command(about = "Content API for the travel agency website")]
struct Args {
    /// TOML configuration file. Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => CmsConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("travel-cms v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tokens = config.auth.tokens.len(),
        rate_limit_enabled = config.rate_limit.enabled,
        data_path = ?config.storage.data_path,
        "Configuration loaded"
    );
    if config.auth.tokens.is_empty() {
        tracing::warn!("No API tokens configured, admin API is unreachable");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = match &config.storage.data_path {
        Some(path) => ContentStore::open(path)?,
        None => ContentStore::in_memory(),
    };

    // Keep the watcher handle alive for the lifetime of the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
