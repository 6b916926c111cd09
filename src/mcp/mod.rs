//! Model Context Protocol (MCP) server implementation
//!
//! This module provides the MCP tool surface:
//! - Read-only tools (markets, account state, history) forwarded as GET
//! - Mutating tools (orders, account settings) forwarded as signed POST
//!
//! The implementation uses rmcp SDK 0.8.1 with procedural macros for routing.

pub mod handler;
pub mod server;
pub mod types;

// Re-exports
pub use server::ExchangeServer;
