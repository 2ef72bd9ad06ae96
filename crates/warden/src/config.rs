//! Startup configuration, read from the environment.

use std::env;
use std::time::Duration;

use warden_token::{ConfigError, TokenConfig};

/// Env var holding the HMAC secret. Its UTF-8 bytes are the key.
pub const SECRET_VAR: &str = "WARDEN_JWT_SECRET";

/// Env var holding the token lifetime in milliseconds.
pub const TTL_VAR: &str = "WARDEN_JWT_TTL_MS";

/// Env var holding the login timeout in milliseconds (optional).
pub const LOGIN_TIMEOUT_VAR: &str = "WARDEN_LOGIN_TIMEOUT_MS";

/// Default bound on how long a login may wait for the identity backends.
pub const DEFAULT_LOGIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything Warden needs at startup.
#[derive(Debug, Clone)]
pub struct WardenConfig {
    /// Signing key and token lifetime.
    pub token: TokenConfig,

    /// Upper bound on a whole login, including both collaborator calls.
    pub login_timeout: Duration,
}

impl WardenConfig {
    /// Creates a config with the default login timeout.
    pub fn new(token: TokenConfig) -> Self {
        Self {
            token,
            login_timeout: DEFAULT_LOGIN_TIMEOUT,
        }
    }

    /// Overrides the login timeout.
    pub fn with_login_timeout(mut self, timeout: Duration) -> Self {
        self.login_timeout = timeout;
        self
    }

    /// Loads the config from process environment variables.
    ///
    /// # Errors
    /// A [`ConfigError`] if [`SECRET_VAR`] or [`TTL_VAR`] is missing or
    /// invalid, or [`LOGIN_TIMEOUT_VAR`] is set but unparsable. Callers
    /// should treat this as fatal and refuse to start.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads the config through an arbitrary variable lookup.
    ///
    /// `from_env` is this with `std::env::var`; tests pass a map instead
    /// of mutating the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_VAR)
            .ok_or_else(|| ConfigError::MissingVar(SECRET_VAR.to_string()))?;
        let ttl_ms = parse_millis(TTL_VAR, lookup(TTL_VAR))?
            .ok_or_else(|| ConfigError::MissingVar(TTL_VAR.to_string()))?;
        let login_timeout = parse_millis(LOGIN_TIMEOUT_VAR, lookup(LOGIN_TIMEOUT_VAR))?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_LOGIN_TIMEOUT);

        let config = Self {
            token: TokenConfig::new(secret, ttl_ms)?,
            login_timeout,
        };
        tracing::info!(
            ttl_ms,
            login_timeout_ms = config.login_timeout.as_millis() as u64,
            "warden configuration loaded"
        );
        Ok(config)
    }
}

fn parse_millis(
    name: &str,
    value: Option<String>,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = value else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidVar {
            name: name.to_string(),
            value,
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "config-test-secret-0123456789abcdef";

    fn lookup(
        vars: &[(&str, &str)],
    ) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_reads_all_vars() {
        let config = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, SECRET),
            (TTL_VAR, "900000"),
            (LOGIN_TIMEOUT_VAR, "250"),
        ]))
        .unwrap();

        assert_eq!(config.token.expiration.ttl(), Duration::from_secs(900));
        assert_eq!(config.token.key.len(), SECRET.len());
        assert_eq!(config.login_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_from_lookup_defaults_login_timeout() {
        let config = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, SECRET),
            (TTL_VAR, "1000"),
        ]))
        .unwrap();

        assert_eq!(config.login_timeout, DEFAULT_LOGIN_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_missing_secret_is_fatal() {
        let result = WardenConfig::from_lookup(lookup(&[(TTL_VAR, "1000")]));
        assert!(
            matches!(&result, Err(ConfigError::MissingVar(v)) if v == SECRET_VAR),
            "got {result:?}"
        );
    }

    #[test]
    fn test_from_lookup_missing_ttl_is_fatal() {
        let result = WardenConfig::from_lookup(lookup(&[(SECRET_VAR, SECRET)]));
        assert!(matches!(&result, Err(ConfigError::MissingVar(v)) if v == TTL_VAR));
    }

    #[test]
    fn test_from_lookup_empty_secret_is_missing() {
        let result = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, ""),
            (TTL_VAR, "1000"),
        ]));
        assert!(matches!(result, Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn test_from_lookup_weak_secret_is_rejected() {
        let result = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, "short"),
            (TTL_VAR, "1000"),
        ]));
        assert!(matches!(result, Err(ConfigError::WeakSecret { len: 5, .. })));
    }

    #[test]
    fn test_from_lookup_unparsable_ttl_is_invalid() {
        let result = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, SECRET),
            (TTL_VAR, "one hour"),
        ]));
        assert!(matches!(
            &result,
            Err(ConfigError::InvalidVar { name, value }) if name == TTL_VAR && value == "one hour"
        ));
    }

    #[test]
    fn test_from_lookup_zero_ttl_is_invalid() {
        let result = WardenConfig::from_lookup(lookup(&[
            (SECRET_VAR, SECRET),
            (TTL_VAR, "0"),
        ]));
        assert!(matches!(result, Err(ConfigError::InvalidTtl)));
    }
}
