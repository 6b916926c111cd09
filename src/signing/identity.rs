//! Sender identity: account address plus base58 secret key

use crate::config::credentials::SecretString;
use crate::error::SigningError;
use crate::signing::primitive::signing_key_from_bytes;
use zeroize::Zeroizing;

/// The account requests are sent on behalf of, and the key that signs them
///
/// The secret stays base58-encoded at rest; raw key bytes only exist inside
/// [`Identity::secret_bytes`]'s zeroizing buffer for one signing call.
#[derive(Clone, Debug)]
pub struct Identity {
    address: String,
    secret: SecretString,
}

impl Identity {
    /// Builds an identity from a base58 secret key
    ///
    /// When `address` is `None` it is derived from the secret's Ed25519 public
    /// key; when given it must be that key. The secret is decoded once here so that a malformed key fails at
    /// startup rather than on the first order.
    pub fn new(address: Option<String>, secret: SecretString) -> Result<Self, SigningError> {
        let bytes = decode_base58("secret key", secret.expose_secret())?;
        let signing_key = signing_key_from_bytes(&bytes)?;

        let derived = encode_base58(signing_key.verifying_key().as_bytes());
        let address = match address {
            Some(address) if address.trim() == derived => derived,
            Some(address) => {
                decode_base58("address", &address)?;
                return Err(SigningError::AddressMismatch);
            }
            None => derived,
        };

        Ok(Self { address, secret })
    }

    /// Base58 account address (Ed25519 public key)
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw secret key bytes, wiped on drop
    pub(crate) fn secret_bytes(&self) -> Result<Zeroizing<Vec<u8>>, SigningError> {
        decode_base58("secret key", self.secret.expose_secret()).map(Zeroizing::new)
    }
}

pub fn decode_base58(what: &'static str, value: &str) -> Result<Vec<u8>, SigningError> {
    bs58::decode(value.trim())
        .into_vec()
        .map_err(|_| SigningError::InvalidEncoding { what })
}

pub fn encode_base58(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}
