// Library exports for perpdex-provider

pub mod config; // Configuration management
pub mod error;
pub mod exchange; // Exchange REST client
pub mod mcp; // MCP server implementation
pub mod operations; // Operation table
pub mod signing; // Canonical messages and signatures
pub mod transport; // MCP transports (stdio, SSE)
