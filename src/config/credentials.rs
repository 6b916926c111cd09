//! Signing Credential Management
//!
//! Secure handling of the base58 secret key loaded from environment variables.
//! The secret is never logged; its Debug form is fully masked.

use crate::error::ProviderError;
use crate::signing::Identity;
use std::fmt;

/// Secure string wrapper that masks sensitive data in logs
///
/// Debug output shows only `SecretString(***)`. There is no Display impl.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a String
    pub fn new(value: String) -> Self {
        SecretString(value)
    }

    /// Returns a reference to the inner string
    ///
    /// Only the signer should call this. Never log the returned value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString(***)")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        zeroize::Zeroize::zeroize(&mut self.0);
    }
}

/// Sender address and secret as read from the environment
///
/// `PERPDEX_ADDRESS` alone is enough for read-only tools; `PERPDEX_SECRET_KEY`
/// enables signing.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub address: Option<String>,
    pub secret_key: Option<SecretString>,
}

impl Credentials {
    /// Loads credentials through `lookup`; values are trimmed and empty values
    /// count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            address: read("PERPDEX_ADDRESS"),
            secret_key: read("PERPDEX_SECRET_KEY").map(SecretString::new),
        }
    }

    /// Decodes the signing identity, if a secret is configured
    ///
    /// # Errors
    /// Returns `Signing` if the secret or address is not valid base58 key material.
    pub fn identity(&self) -> Result<Option<Identity>, ProviderError> {
        match &self.secret_key {
            Some(secret) => Ok(Some(Identity::new(self.address.clone(), secret.clone())?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_masks_secret() {
        let secret = SecretString::new("4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw9".to_string());
        assert_eq!(format!("{:?}", secret), "SecretString(***)");

        let creds = Credentials {
            address: None,
            secret_key: Some(secret),
        };
        assert!(!format!("{:?}", creds).contains("4wBq"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let creds = Credentials::from_lookup(|name| match name {
            "PERPDEX_ADDRESS" => Some("   ".to_string()),
            "PERPDEX_SECRET_KEY" => Some(String::new()),
            _ => None,
        });
        assert!(creds.address.is_none());
        assert!(creds.secret_key.is_none());
    }

    #[test]
    fn test_no_secret_no_identity() {
        let creds = Credentials {
            address: Some("11111111111111111111111111111111".to_string()),
            secret_key: None,
        };
        assert!(creds.identity().unwrap().is_none());
    }

    #[test]
    fn test_bad_secret_rejected() {
        let creds = Credentials {
            address: None,
            secret_key: Some(SecretString::new("not-base58!".to_string())),
        };
        assert!(matches!(
            creds.identity(),
            Err(ProviderError::Signing(_))
        ));
    }
}
