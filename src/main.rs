//! PDDIKTI Gateway (v1)
//!
//! A read-only JSON gateway over the Indonesian higher-education registry,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────┐
//!                        │                    GATEWAY                     │
//!                        │                                                │
//!     Client Request     │  ┌─────────┐   ┌──────────┐   ┌────────────┐   │
//!     ───────────────────┼─▶│  http   │──▶│ handlers │──▶│  upstream  │───┼──▶ Registry
//!                        │  │ server  │   │          │   │  session   │   │    API
//!                        │  └─────────┘   └────┬─────┘   └─────┬──────┘   │
//!                        │                     │               │          │
//!     Client Response    │  ┌──────────┐       ▼               │          │
//!     ◀──────────────────┼──│ envelope │◀── shaping ◀─────────┘          │
//!                        │  └──────────┘                                  │
//!                        │                                                │
//!                        │  config · observability · lifecycle            │
//!                        └────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pddikti_gateway::config::{load_config, GatewayConfig};
use pddikti_gateway::lifecycle::signals::spawn_signal_listener;
use pddikti_gateway::observability::{logging, metrics};
use pddikti_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "pddikti-gateway")]
#[command(about = "JSON gateway over the PDDIKTI higher-education registry", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pddikti-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        max_sessions = config.upstream.max_sessions,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let server = HttpServer::new(config.clone())?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let signals = spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;
    signals.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
