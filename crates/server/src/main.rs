//! surf MCP server entry point.
//!
//! Loads configuration, selects the search provider, and serves the tools on
//! stdio. Logging goes to stderr to avoid interfering with the JSON-RPC
//! protocol on stdout.

use anyhow::{Context, Result};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use surf_client::{Reader, select};
use surf_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod format;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;
    let reader = Reader::new(&config).context("failed to build HTTP client")?;
    let search = select(&config.search, &config.user_agent).context("failed to configure search provider")?;

    tracing::info!(provider = %search.kind(), "starting surf server on stdio transport");

    let handler = handler::SurfServer::new(reader, search);
    let server = serve_server(handler, stdio()).await?;

    server.waiting().await?;

    Ok(())
}
