//! Exchange REST API
//!
//! This module contains the HTTP client and the resolved request type it sends.

pub mod client;
pub mod request;

// Re-export commonly used types
pub use client::ExchangeClient;
pub use request::OutboundRequest;
