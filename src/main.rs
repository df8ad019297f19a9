//! Image upload relay.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                       IMAGE RELAY                          Upstream
//!  ─────────▶ ┌────────┐   ┌────────────────┐   ┌──────────────┐
//!  multipart  │  cors  │──▶│ request id +   │──▶│ relay handler│──── POST file ───▶
//!             │        │   │ trace span     │   │              │
//!  ◀───────── └────────┘   └────────────────┘   └──────────────┘◀─── bytes/status ─
//!  image/png or {"error": ...}, always 200
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use img_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use img_relay::http::HttpServer;
use img_relay::lifecycle::{wait_for_signal, Shutdown};
use img_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "img-relay", version)]
#[command(about = "Relay image uploads to an ingestion service", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.url.
    #[arg(long)]
    upstream_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(url) = cli.upstream_url {
        config.upstream.url = url;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);
    tracing::info!("img-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        request_timeout_secs = config.upstream.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Address format was checked by validate_config.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
