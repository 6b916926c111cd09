//! Stdio Transport for MCP Server
//!
//! Provides standard I/O transport for local MCP connections (e.g., desktop
//! MCP clients). Logging goes to stderr so stdout carries only protocol frames.

use crate::mcp::ExchangeServer;
use rmcp::ServiceExt;

/// Runs the MCP server with stdio transport until the client disconnects
pub async fn run_stdio_server(server: ExchangeServer) -> anyhow::Result<()> {
    tracing::info!("Starting exchange MCP server in stdio mode");

    let service = server.serve(rmcp::transport::stdio()).await?;

    tracing::info!("MCP server ready on stdio");

    service.waiting().await?;

    tracing::info!("MCP server shutdown complete");

    Ok(())
}
