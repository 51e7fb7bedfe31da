//! API ingress server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────────┐
//!                        │                     INGRESS                          │
//!                        │                                                      │
//!     Client Request     │  ┌───────────┐   ┌──────────┐   ┌──────────────┐      │
//!     ───────────────────┼─▶│ transport │──▶│  origin  │──▶│ domain routes│      │
//!                        │  │ plain/TLS │   │   gate   │   │  (external)  │      │
//!                        │  └───────────┘   └──────────┘   └──────┬───────┘      │
//!                        │                                      │ failure / none │
//!                        │                                      ▼                │
//!     Client Response    │                 ┌───────────────┐  ┌────────────┐     │
//!     ◀──────────────────┼─────────────────│    failure    │  │ not found  │     │
//!                        │                 │  interceptor  │  │ responder  │     │
//!                        │                 └──────┬────────┘  └────────────┘     │
//!                        │                        │ detached                     │
//!                        │                        ▼                              │
//!                        │                 error webhook ───────────────────────┼──▶ target
//!                        │                                                      │
//!                        │  startup: provision → bind → serve → +delay POST ────┼──▶ provisioning
//!                        └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use api_ingress::config::{load_config, IngressConfig};
use api_ingress::http::{build_app, status::status_routes};
use api_ingress::lifecycle::{service_name_from_env, StartupSequencer};
use api_ingress::net::{provision, TransportConfig};
use api_ingress::notify::ErrorNotifier;
use api_ingress::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "api-ingress")]
#[command(about = "HTTP ingress with origin policy, error relay and TLS termination", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => IngressConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "api-ingress starting");

    tracing::info!(
        kind = %config.server.kind,
        port = config.server.port,
        url = %config.server.url,
        webhook_enabled = config.webhook.enabled,
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

    let config = Arc::new(config);
    let client = reqwest::Client::new();

    // Entry point first; the transport only wraps it.
    let notifier = Arc::new(ErrorNotifier::new(&config, client.clone()));
    let app = build_app(&config, notifier, status_routes());

    let transport = provision(&TransportConfig::from_config(&config), app).await?;

    let service_name = service_name_from_env(&config.provisioning.service_name_env);
    let running = StartupSequencer::new(config, client)
        .with_service_name(service_name)
        .start(transport)
        .await?;

    running.wait().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
