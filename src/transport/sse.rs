//! SSE (Server-Sent Events) transport for MCP
//!
//! Uses rmcp's built-in SSE server implementation for remote connections.

use crate::mcp::ExchangeServer;
use anyhow::Context;
use std::net::SocketAddr;

pub use rmcp::transport::sse_server::{SseServer, SseServerConfig};
pub use tokio_util::sync::CancellationToken;

/// Runs the MCP server over SSE on `port` until Ctrl+C
///
/// Every SSE session gets its own clone of `server`; clones share the same
/// immutable configuration.
pub async fn run_sse_server(server: ExchangeServer, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port)
        .parse()
        .context("invalid SSE bind address")?;
    tracing::info!("Starting SSE server on {}", addr);

    let config = SseServerConfig {
        bind: addr,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: CancellationToken::new(),
        sse_keep_alive: None,
    };

    let sse_server = SseServer::serve_with_config(config)
        .await
        .with_context(|| format!("failed to bind SSE server on {}", addr))?;
    tracing::info!("SSE server ready on {}", addr);
    tracing::info!("  SSE endpoint: http://{}/sse", addr);
    tracing::info!("  POST endpoint: http://{}/message", addr);

    let shutdown_ct = sse_server.with_service(move || server.clone());

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Received shutdown signal (Ctrl+C)");
    shutdown_ct.cancel();

    Ok(())
}
