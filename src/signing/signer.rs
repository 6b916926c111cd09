//! CanonicalSigner: canonicalize, sign and assemble outbound payloads

use crate::error::{ConfigError, Result};
use crate::operations::OperationSpec;
use crate::signing::canonical::canonicalize;
use crate::signing::identity::{decode_base58, encode_base58, Identity};
use crate::signing::primitive::{Ed25519, SigningPrimitive};
use crate::signing::ParameterRecord;
use serde_json::Value;
use std::sync::Arc;

/// Body field carrying the sender identity
pub const ACCOUNT_FIELD: &str = "account";

/// Body field carrying the base58 signature
pub const SIGNATURE_FIELD: &str = "signature";

/// A mutating request ready for transport
///
/// `signature` is valid over exactly `message`, which the exchange recomputes
/// from `params` using the same operation table entry.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub message: String,
    pub signature: String,
    pub account: String,
    pub params: ParameterRecord,
}

impl SignedRequest {
    /// JSON body: sender identity, every parameter, signature
    pub fn into_body(self) -> ParameterRecord {
        let mut body = self.params;
        body.insert(ACCOUNT_FIELD.to_string(), Value::String(self.account));
        body.insert(SIGNATURE_FIELD.to_string(), Value::String(self.signature));
        body
    }
}

/// Signs canonical messages with a pluggable [`SigningPrimitive`]
#[derive(Clone)]
pub struct CanonicalSigner {
    primitive: Arc<dyn SigningPrimitive>,
}

impl std::fmt::Debug for CanonicalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanonicalSigner").finish_non_exhaustive()
    }
}

impl CanonicalSigner {
    pub fn new(primitive: Arc<dyn SigningPrimitive>) -> Self {
        Self { primitive }
    }

    /// Renders the canonical message for `spec` (see [`canonicalize`])
    pub fn canonicalize(&self, spec: &OperationSpec, params: &ParameterRecord) -> Result<String> {
        canonicalize(spec, params)
    }

    /// Signs `message` and returns the base58 signature
    ///
    /// # Errors
    /// * `Configuration(NoIdentityConfigured)` - `identity` is `None`; the
    ///   primitive is not called
    /// * `Signing` - the secret cannot be decoded or is rejected by the primitive
    pub fn sign(&self, message: &str, identity: Option<&Identity>) -> Result<String> {
        let identity = identity.ok_or(ConfigError::NoIdentityConfigured)?;
        let secret = identity.secret_bytes()?;

        let signature = self.primitive.sign(message.as_bytes(), &secret)?;
        Ok(encode_base58(&signature))
    }

    /// Checks a base58 `signature` over `message` against a base58 `address`
    pub fn verify(&self, message: &str, signature: &str, address: &str) -> Result<()> {
        let signature = decode_base58("signature", signature)?;
        let public_key = decode_base58("address", address)?;

        self.primitive
            .verify(message.as_bytes(), &signature, &public_key)
            .map_err(Into::into)
    }

    /// Canonicalizes, signs with the configured identity and assembles the payload
    pub fn build_signed_request(
        &self,
        spec: &OperationSpec,
        params: ParameterRecord,
        identity: Option<&Identity>,
    ) -> Result<SignedRequest> {
        // No identity means no canonicalization or primitive call at all.
        let identity = identity.ok_or(ConfigError::NoIdentityConfigured)?;
        let message = self.canonicalize(spec, &params)?;
        let signature = self.sign(&message, Some(identity))?;

        Ok(SignedRequest {
            message,
            signature,
            account: identity.address().to_string(),
            params,
        })
    }

    /// Assembles the payload for a caller-signed request after verifying it
    ///
    /// # Errors
    /// * `Signing(VerificationFailed)` - the signature does not cover the
    ///   canonical message recomputed from `params`
    pub fn attach_presigned(
        &self,
        spec: &OperationSpec,
        params: ParameterRecord,
        account: String,
        signature: String,
    ) -> Result<SignedRequest> {
        let message = self.canonicalize(spec, &params)?;
        self.verify(&message, &signature, &account)?;

        Ok(SignedRequest {
            message,
            signature,
            account,
            params,
        })
    }
}

impl Default for CanonicalSigner {
    fn default() -> Self {
        Self::new(Arc::new(Ed25519))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::credentials::SecretString;
    use crate::error::{ProviderError, SigningError};
    use crate::operations::{CANCEL_ORDER, UPDATE_LEVERAGE};
    use serde_json::json;

    fn identity() -> Identity {
        Identity::new(None, SecretString::new(encode_base58(&[3u8; 32]))).unwrap()
    }

    fn leverage_params() -> ParameterRecord {
        json!({ "symbol": "eth", "leverage": 10 })
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_build_signed_request() {
        let signer = CanonicalSigner::default();
        let id = identity();

        let request = signer
            .build_signed_request(&UPDATE_LEVERAGE, leverage_params(), Some(&id))
            .unwrap();

        assert_eq!(request.message, "ETH,10");
        assert_eq!(request.account, id.address());
        assert!(signer
            .verify(&request.message, &request.signature, id.address())
            .is_ok());
    }

    #[test]
    fn test_body_contains_all_fields() {
        let signer = CanonicalSigner::default();
        let id = identity();
        let body = signer
            .build_signed_request(&UPDATE_LEVERAGE, leverage_params(), Some(&id))
            .unwrap()
            .into_body();

        assert_eq!(body["symbol"], json!("eth"));
        assert_eq!(body["leverage"], json!(10));
        assert_eq!(body[ACCOUNT_FIELD], json!(id.address()));
        assert!(body[SIGNATURE_FIELD].is_string());
    }

    #[test]
    fn test_no_identity() {
        let signer = CanonicalSigner::default();
        let err = signer
            .build_signed_request(&UPDATE_LEVERAGE, leverage_params(), None)
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Configuration(ConfigError::NoIdentityConfigured)
        ));
    }

    #[test]
    fn test_presigned_accepts_valid_signature() {
        let signer = CanonicalSigner::default();
        let id = identity();
        let params = json!({ "symbol": "btc", "order_id": 42 })
            .as_object()
            .cloned()
            .unwrap();
        let signature = signer.sign("BTC,42", Some(&id)).unwrap();

        let request = signer
            .attach_presigned(&CANCEL_ORDER, params, id.address().to_string(), signature)
            .unwrap();
        assert_eq!(request.message, "BTC,42");
    }

    #[test]
    fn test_presigned_rejects_other_message() {
        let signer = CanonicalSigner::default();
        let id = identity();
        let params = json!({ "symbol": "btc", "order_id": 43 })
            .as_object()
            .cloned()
            .unwrap();
        let signature = signer.sign("BTC,42", Some(&id)).unwrap();

        let err = signer
            .attach_presigned(&CANCEL_ORDER, params, id.address().to_string(), signature)
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Signing(SigningError::VerificationFailed)
        ));
    }
}
