//! DID Explorer Gateway — entry point.
//!
//! Re-exposes a subset of a ledger node's internal APIs to a web UI, enriching
//! the transaction log into an identity registry and the diagnostics into a
//! peer graph.

mod api;
mod config;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use api::AppState;
use config::GatewayConfig;
use explorer_client::HttpNodeClient;

/// DID Explorer Gateway
#[derive(Parser, Debug)]
#[command(name = "explorer-gateway", version, about = "DID Explorer Gateway")]
struct Args {
    /// Address the gateway listens on.
    #[arg(long, env = "DID_EXPLORER_ADDRESS", default_value = "0.0.0.0:8080")]
    listen_addr: String,

    /// Upstream ledger node API address. Required.
    #[arg(long, env = "DID_EXPLORER_NODE_ADDRESS")]
    node_address: String,

    /// Upstream status address; defaults to the node address.
    #[arg(long, env = "DID_EXPLORER_NODE_STATUS_ADDRESS")]
    status_address: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = GatewayConfig::resolve(args.listen_addr, args.node_address, args.status_address);
    tracing::info!(node = %config.node_address, status = %config.status_address, "proxying calls to ledger node");

    let client = HttpNodeClient::new(&config.node_address, &config.status_address)?;
    let app = api::build_router(AppState {
        node: Arc::new(client),
    });

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(listen_addr = %config.listen_addr, "gateway started");

    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
        tracing::info!("received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("gateway exited cleanly");
    Ok(())
}
