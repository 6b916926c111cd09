//! Detached-signature primitive
//!
//! The signer only needs two things from a signature scheme: produce a
//! detached signature over raw bytes, and check one. [`Ed25519`] is the
//! scheme the exchange accepts; tests substitute their own implementations.

use crate::error::SigningError;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};

/// A detached-signature scheme keyed by raw secret bytes
pub trait SigningPrimitive: Send + Sync {
    /// Signs `message` with `secret` and returns the raw signature bytes
    fn sign(&self, message: &[u8], secret: &[u8]) -> Result<Vec<u8>, SigningError>;

    /// Checks a raw signature over `message` against a raw public key
    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), SigningError>;
}

/// Ed25519 (RFC 8032). Deterministic: equal inputs give equal signatures.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519;

impl SigningPrimitive for Ed25519 {
    fn sign(&self, message: &[u8], secret: &[u8]) -> Result<Vec<u8>, SigningError> {
        let signing_key = signing_key_from_bytes(secret)?;
        Ok(signing_key.sign(message).to_bytes().to_vec())
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &[u8],
        public_key: &[u8],
    ) -> Result<(), SigningError> {
        let key_bytes: [u8; 32] =
            public_key
                .try_into()
                .map_err(|_| SigningError::KeyLength {
                    expected: "32",
                    actual: public_key.len(),
                })?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;

        let signature = Signature::from_slice(signature)
            .map_err(|_| SigningError::SignatureLength(signature.len()))?;

        verifying_key
            .verify_strict(message, &signature)
            .map_err(|_| SigningError::VerificationFailed)
    }
}

/// Builds an Ed25519 key from a 32-byte seed or a 64-byte `seed || public` keypair
///
/// A 64-byte keypair whose public half does not match its seed is rejected.
pub fn signing_key_from_bytes(secret: &[u8]) -> Result<SigningKey, SigningError> {
    match secret.len() {
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(secret);
            let key = SigningKey::from_bytes(&seed);
            zeroize::Zeroize::zeroize(&mut seed);
            Ok(key)
        }
        64 => {
            let mut keypair = [0u8; 64];
            keypair.copy_from_slice(secret);
            let key = SigningKey::from_keypair_bytes(&keypair)
                .map_err(|e| SigningError::InvalidKey(e.to_string()));
            zeroize::Zeroize::zeroize(&mut keypair);
            key
        }
        actual => Err(SigningError::KeyLength {
            expected: "32 or 64",
            actual,
        }),
    }
}
