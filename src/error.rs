use rmcp::model::ErrorData;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] ExchangeError),

    #[error("Signing error: {0}")]
    Signing(#[from] SigningError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ProviderError::Validation(_) => "validation_error",
            ProviderError::Configuration(ConfigError::NoIdentityConfigured) => {
                "no_identity_configured"
            }
            ProviderError::Configuration(_) => "configuration_error",
            ProviderError::Transport(err) => err.error_type(),
            ProviderError::Signing(_) => "signing_error",
            ProviderError::Json(_) => "serialization_error",
        }
    }
}

/// Misconfiguration of an operation table entry or of the process settings.
///
/// None of these are caused by tool input, so they are never retried.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("operation '{operation}' declares signable field '{field}' but the request has no value for it")]
    MissingSignableField {
        operation: &'static str,
        field: String,
    },

    #[error("operation '{operation}' has no rendering rule for field '{field}': {reason}")]
    UnrenderableField {
        operation: &'static str,
        field: String,
        reason: String,
    },

    #[error("no signing identity configured; set PERPDEX_SECRET_KEY to enable signed operations")]
    NoIdentityConfigured,

    #[error("{0} is not set")]
    MissingSetting(&'static str),

    #[error("{name} is invalid: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}

/// Failures from the signing primitive or from key/signature decoding.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SigningError {
    #[error("{what} is not valid base58")]
    InvalidEncoding { what: &'static str },

    #[error("key material must be {expected} bytes, got {actual}")]
    KeyLength { expected: &'static str, actual: usize },

    #[error("key material rejected: {0}")]
    InvalidKey(String),

    #[error("signature must be 64 bytes, got {0}")]
    SignatureLength(usize),

    #[error("signature does not match the canonical message for this account")]
    VerificationFailed,

    #[error("PERPDEX_ADDRESS does not match the public key of PERPDEX_SECRET_KEY")]
    AddressMismatch,
}

/// Errors talking to the exchange REST API
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Exchange returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExchangeError {
    pub fn error_type(&self) -> &'static str {
        match self {
            ExchangeError::Connection(_) => "connection_error",
            ExchangeError::Status { .. } => "http_status",
            ExchangeError::Parse(_) => "parse_error",
            ExchangeError::Internal(_) => "internal_error",
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Connection(
                "Request timeout. Please check your internet connection.".to_string(),
            )
        } else if err.is_connect() {
            ExchangeError::Connection(
                "Failed to connect to the exchange API. Please check the base URL and your connection."
                    .to_string(),
            )
        } else if err.is_decode() || err.is_body() {
            ExchangeError::Parse(format!("Failed to read response body: {}", err))
        } else {
            ExchangeError::Internal(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;

impl From<ProviderError> for ErrorData {
    fn from(err: ProviderError) -> Self {
        let data = Some(serde_json::json!({ "type": err.error_type() }));
        match err {
            ProviderError::Validation(_) => ErrorData::invalid_params(err.to_string(), data),
            _ => ErrorData::internal_error(err.to_string(), data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_invalid_params() {
        let err: ErrorData = ProviderError::Validation("amount must be positive".into()).into();
        assert_eq!(err.code, ErrorData::invalid_params("", None).code);
        assert!(err.message.contains("amount must be positive"));
    }

    #[test]
    fn test_missing_identity_maps_to_internal_error() {
        let err: ErrorData = ProviderError::from(ConfigError::NoIdentityConfigured).into();
        assert_eq!(err.code, ErrorData::internal_error("", None).code);
        assert_eq!(
            err.data,
            Some(serde_json::json!({ "type": "no_identity_configured" }))
        );
    }

    #[test]
    fn test_status_error_type() {
        let err = ProviderError::from(ExchangeError::Status {
            status: 400,
            body: "{}".into(),
        });
        assert_eq!(err.error_type(), "http_status");
    }
}
