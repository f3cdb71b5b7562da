//! API gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────────┐
//!                        │                    API GATEWAY                    │
//!                        │                                                   │
//!   Client Request       │  ┌─────────┐    ┌──────────┐    ┌──────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│ routing  │───▶│ HttpProxy    │──┼──▶ Backend
//!                        │  │ server  │    │ gateway  │    │ director +   │  │
//!                        │  └─────────┘    └────┬─────┘    │ interceptor  │  │
//!                        │                      │          └──────────────┘  │
//!                        │                      │          ┌──────────────┐  │
//!                        │                      └─────────▶│ PublishProxy │──┼──▶ SNS topic
//!                        │                                 │ envelope     │  │
//!                        │                                 └──────────────┘  │
//!                        │  config · observability · lifecycle               │
//!                        └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_gateway::config::load_config;
use api_gateway::lifecycle::{bind_listener, build_gateway, Shutdown};
use api_gateway::observability::{logging, metrics};
use api_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Lightweight HTTP gateway with passthrough and publish routes", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "gateway.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if cli.check {
        println!("{}: ok ({} routes)", cli.config.display(), config.routes.len());
        return Ok(());
    }

    let gateway = build_gateway(&config).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = bind_listener(&config.listener).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(gateway);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
