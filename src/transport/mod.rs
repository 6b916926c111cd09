//! MCP transport layer
//!
//! Provides transport options for the MCP protocol:
//! - Stdio: Standard I/O for local connections
//! - SSE: Server-Sent Events for remote connections

pub mod stdio;

#[cfg(feature = "sse")]
pub mod sse;

use std::fmt;
use std::str::FromStr;

/// Transport mode selection for the MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportMode {
    /// Standard I/O transport (local MCP connections)
    #[default]
    Stdio,

    /// Server-Sent Events transport (remote MCP connections)
    Sse,
}

impl TransportMode {
    /// Default listening port for network transports
    pub fn default_port(&self) -> u16 {
        match self {
            TransportMode::Stdio => 0,
            TransportMode::Sse => 8000,
        }
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stdio" => Ok(TransportMode::Stdio),
            "sse" => Ok(TransportMode::Sse),
            other => Err(format!("Invalid mode: {}", other)),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Stdio => write!(f, "stdio"),
            TransportMode::Sse => write!(f, "sse"),
        }
    }
}
