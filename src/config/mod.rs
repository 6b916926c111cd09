//! Configuration Management
//!
//! Process-wide settings are read once at startup into an immutable
//! [`ProviderConfig`] which is then shared by reference. Nothing downstream
//! reads the environment.

pub mod credentials;

use crate::error::{ConfigError, ProviderError};
use crate::signing::Identity;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// Re-export
pub use credentials::{Credentials, SecretString};

/// Default HTTP timeout for exchange requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Who produces signatures for mutating operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMode {
    /// The server signs with `PERPDEX_SECRET_KEY`
    #[default]
    Local,
    /// Callers pass `account` and `signature`; the server verifies them
    PreSigned,
}

impl FromStr for SigningMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(SigningMode::Local),
            "presigned" | "pre-signed" => Ok(SigningMode::PreSigned),
            other => Err(ConfigError::InvalidSetting {
                name: "PERPDEX_SIGNING_MODE",
                reason: format!("expected 'local' or 'presigned', got '{}'", other),
            }),
        }
    }
}

impl fmt::Display for SigningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningMode::Local => write!(f, "local"),
            SigningMode::PreSigned => write!(f, "presigned"),
        }
    }
}

/// Immutable provider configuration
///
/// ## Environment Variables
///
/// - `PERPDEX_BASE_URL`: exchange REST base URL (required)
/// - `PERPDEX_ADDRESS`: sender address (optional, derived from the secret)
/// - `PERPDEX_SECRET_KEY`: base58 Ed25519 secret (optional)
/// - `PERPDEX_SIGNING_MODE`: `local` or `presigned` (default: local)
/// - `PERPDEX_TIMEOUT_SECS`: request timeout in seconds (default: 10)
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub signing_mode: SigningMode,
    /// Signing identity; `None` leaves only read-only and pre-signed tools usable
    pub identity: Option<Identity>,
    /// Default sender for read-only tools when no identity is configured
    pub address: Option<String>,
}

impl ProviderConfig {
    /// Loads the configuration from environment variables
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through `lookup`
    ///
    /// # Errors
    /// * `Configuration(MissingSetting)` - `PERPDEX_BASE_URL` is unset
    /// * `Configuration(InvalidSetting)` - malformed URL, mode or timeout
    /// * `Signing` - the secret key is not valid key material
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let base_url = lookup("PERPDEX_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingSetting("PERPDEX_BASE_URL"))?;

        reqwest::Url::parse(&base_url).map_err(|e| ConfigError::InvalidSetting {
            name: "PERPDEX_BASE_URL",
            reason: e.to_string(),
        })?;

        let signing_mode = match lookup("PERPDEX_SIGNING_MODE") {
            Some(mode) => mode.parse()?,
            None => SigningMode::default(),
        };

        let timeout_secs = match lookup("PERPDEX_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidSetting {
                    name: "PERPDEX_TIMEOUT_SECS",
                    reason: format!("expected a positive integer, got '{}'", raw),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let credentials = Credentials::from_lookup(&lookup);
        let identity = credentials.identity()?;

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            signing_mode,
            identity,
            address: credentials.address,
        })
    }

    /// Replaces the signing mode (command-line override)
    pub fn with_signing_mode(mut self, signing_mode: SigningMode) -> Self {
        self.signing_mode = signing_mode;
        self
    }

    /// Address used when a tool call names no account
    pub fn sender_address(&self) -> Option<&str> {
        self.identity
            .as_ref()
            .map(Identity::address)
            .or(self.address.as_deref())
    }
}
