//! storefront-proxy server entry point.
//!
//! Loads configuration, opens the cache database, installs the configured
//! proxy version, then serves MCP on stdio.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use storefront_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    tracing::info!(
        db_path = %config.db_path.display(),
        origin = %config.origin,
        cache = %config.cache_name,
        "Starting storefront-proxy on stdio transport"
    );

    let state = Arc::new(state::AppState::open(config).await.context("opening cache database")?);
    state.bootstrap().await;

    let handler = handler::StorefrontServer::new(state);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
