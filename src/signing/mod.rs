//! Request Signing
//!
//! Canonical message construction and detached Ed25519 signatures for
//! mutating exchange operations. Read-only operations never reach this module.

pub mod canonical;
pub mod identity;
pub mod primitive;
pub mod signer;

/// Validated tool arguments for one invocation, keyed by field name
pub type ParameterRecord = serde_json::Map<String, serde_json::Value>;

// Re-exports
pub use canonical::canonicalize;
pub use identity::Identity;
pub use primitive::{Ed25519, SigningPrimitive};
pub use signer::{CanonicalSigner, SignedRequest};
