//! The HMAC signing secret.

use std::fmt;

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::ConfigError;

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Symmetric secret used to sign and verify tokens.
///
/// The bytes are wiped from memory when the key is dropped, and the
/// `Debug` impl never prints them, so a key that ends up in a log line
/// or a panic message stays secret. There is intentionally no
/// `Serialize` impl and no accessor for the raw bytes.
#[derive(Clone)]
pub struct SigningKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl SigningKey {
    /// Smallest accepted secret: 256 bits, the HMAC-SHA256 output size.
    pub const MIN_LEN: usize = 32;

    /// Wraps raw secret bytes.
    ///
    /// # Errors
    /// - [`ConfigError::MissingSecret`] if `bytes` is empty
    /// - [`ConfigError::WeakSecret`] if it is shorter than [`Self::MIN_LEN`]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, ConfigError> {
        let bytes = Zeroizing::new(bytes.into());
        if bytes.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if bytes.len() < Self::MIN_LEN {
            return Err(ConfigError::WeakSecret {
                len: bytes.len(),
                min: Self::MIN_LEN,
            });
        }
        Ok(Self { bytes })
    }

    /// Generates a fresh random 256-bit key.
    ///
    /// Handy for tests and single-process development setups. Tokens
    /// signed with it become unverifiable once the process exits.
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::rng().random();
        Self {
            bytes: Zeroizing::new(bytes.to_vec()),
        }
    }

    /// Length of the secret in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; an empty key can't be constructed.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A fresh HMAC-SHA256 instance keyed with this secret.
    pub(crate) fn mac(&self) -> HmacSha256 {
        // HMAC hashes or pads keys of any length, so this can't fail.
        HmacSha256::new_from_slice(&self.bytes)
            .expect("HMAC accepts keys of any length")
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}
