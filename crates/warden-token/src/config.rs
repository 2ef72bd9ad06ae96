//! Token configuration: the signing key and the expiration policy.

use std::time::Duration;

use crate::{ConfigError, SigningKey, Timestamp};

// ---------------------------------------------------------------------------
// ExpirationPolicy
// ---------------------------------------------------------------------------

/// How long an issued token stays valid.
///
/// Applied once, at issuance: `exp = iat + ttl`. After that the token
/// carries its own expiration and the policy is no longer consulted, so
/// changing the TTL only affects tokens issued afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl: Duration,
}

impl ExpirationPolicy {
    /// Creates a policy from a TTL in milliseconds.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTtl`] for a zero TTL, which would
    /// produce tokens that are already expired when issued.
    pub fn from_millis(ttl_ms: u64) -> Result<Self, ConfigError> {
        Self::new(Duration::from_millis(ttl_ms))
    }

    /// Creates a policy from a TTL.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidTtl`] if the TTL is shorter than
    /// one millisecond.
    pub fn new(ttl: Duration) -> Result<Self, ConfigError> {
        if ttl.as_millis() == 0 {
            return Err(ConfigError::InvalidTtl);
        }
        Ok(Self { ttl })
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The expiration instant for a token issued at `issued_at`.
    pub fn expiration_for(&self, issued_at: Timestamp) -> Timestamp {
        issued_at.saturating_add(self.ttl)
    }
}

// ---------------------------------------------------------------------------
// TokenConfig
// ---------------------------------------------------------------------------

/// Everything a [`TokenCodec`](crate::TokenCodec) needs, validated up front.
///
/// Both fields are required; there are no defaults. Construction fails
/// eagerly so a misconfigured process stops at startup instead of failing
/// on its first login.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// The HMAC secret.
    pub key: SigningKey,

    /// Token lifetime.
    pub expiration: ExpirationPolicy,
}

impl TokenConfig {
    /// Builds a config from raw secret bytes and a TTL in milliseconds.
    ///
    /// # Errors
    /// Any [`ConfigError`] from [`SigningKey::new`] or
    /// [`ExpirationPolicy::from_millis`].
    pub fn new(
        secret: impl Into<Vec<u8>>,
        ttl_ms: u64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            key: SigningKey::new(secret)?,
            expiration: ExpirationPolicy::from_millis(ttl_ms)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_expiration_for_adds_ttl() {
        let policy = ExpirationPolicy::from_millis(90_000).unwrap();
        let iat = Timestamp::from_millis(1_000_500);
        assert_eq!(
            policy.expiration_for(iat),
            Timestamp::from_millis(1_090_500)
        );
        assert_eq!(policy.ttl(), Duration::from_secs(90));
    }

    #[test]
    fn test_zero_ttl_is_rejected() {
        assert!(matches!(
            ExpirationPolicy::from_millis(0),
            Err(ConfigError::InvalidTtl)
        ));
        assert!(matches!(
            ExpirationPolicy::new(Duration::from_micros(999)),
            Err(ConfigError::InvalidTtl)
        ));
    }

    #[test]
    fn test_token_config_new_validates_both_fields() {
        let config = TokenConfig::new(SECRET, 3_600_000).expect("valid");
        assert_eq!(config.expiration.ttl(), Duration::from_secs(3600));

        assert!(matches!(
            TokenConfig::new("", 3_600_000),
            Err(ConfigError::MissingSecret)
        ));
        assert!(matches!(
            TokenConfig::new(SECRET, 0),
            Err(ConfigError::InvalidTtl)
        ));
    }
}
