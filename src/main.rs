//! Dashboard backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser widget
//!         │
//!         ▼
//!  ┌──────────────┐    ┌──────────────┐    ┌────────────────┐
//!  │ http server  │───▶│ crypto       │───▶│ response cache │──▶ CoinGecko
//!  │ + handlers   │    │ service      │    │ ttl / cooldown │
//!  └──────────────┘    └──────────────┘    └────────────────┘
//!         │                                        │
//!         ▼                                        ▼
//!  ┌──────────────┐                        ┌────────────────┐
//!  │ admin api    │◀───────────────────────│ cache summary  │
//!  └──────────────┘                        └────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use dashboard_backend::config::load_or_default;
use dashboard_backend::http::HttpServer;
use dashboard_backend::lifecycle::{shutdown_signal, Shutdown};
use dashboard_backend::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "dashboard-backend")]
#[command(about = "Dashboard API with a rate-limit aware upstream cache", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dashboard-backend starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        ttl_secs = config.cache.ttl_secs,
        cooldown_secs = config.cache.cooldown_secs,
        api_key_configured = config.crypto.has_api_key(),
        admin_enabled = config.admin.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        shutdown_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(config)?.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
