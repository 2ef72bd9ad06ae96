//! Unified error type for the Warden facade.

use std::time::Duration;

use warden_auth::AuthError;
use warden_token::{ConfigError, TokenError};

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapping variant auto-generates `From`
/// impls, so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// A presented token was rejected, or a token couldn't be issued.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A login attempt failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Startup configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The identity backends didn't answer within the login timeout.
    #[error("login timed out after {0:?}")]
    Timeout(Duration),

    /// A protected resource was requested without a bearer token.
    #[error("missing bearer token")]
    MissingCredentials,
}

impl WardenError {
    /// The HTTP status an API layer should answer with.
    ///
    /// Every credential and token failure maps to the same 401. Telling
    /// "expired" apart from "bad signature" or "unknown user" apart from
    /// "wrong password" in the response would hand attackers an oracle;
    /// the detail belongs in server logs only.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials => 401,
            Self::Token(e) if e.is_rejection() => 401,
            Self::Auth(AuthError::InvalidCredentials | AuthError::UserNotFound(_)) => 401,
            Self::Auth(AuthError::Backend(_)) | Self::Timeout(_) => 503,
            Self::Token(_) | Self::Auth(AuthError::Token(_)) | Self::Config(_) => 500,
        }
    }

    /// Client-facing error code. Uniform for all 401s, like the status.
    pub fn code(&self) -> &'static str {
        match self.status_code() {
            401 => "UNAUTHORIZED",
            503 => "UNAVAILABLE",
            _ => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use warden_token::Timestamp;

    use super::*;

    #[test]
    fn test_from_token_error() {
        let err: WardenError = TokenError::TamperedSignature.into();
        assert!(matches!(err, WardenError::Token(_)));
        assert_eq!(err.to_string(), "token signature does not match");
    }

    #[test]
    fn test_from_auth_error() {
        let err: WardenError = AuthError::InvalidCredentials.into();
        assert!(matches!(err, WardenError::Auth(_)));
    }

    #[test]
    fn test_from_config_error() {
        let err: WardenError = ConfigError::MissingSecret.into();
        assert!(matches!(err, WardenError::Config(_)));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_all_rejections_share_status_and_code() {
        let rejections: Vec<WardenError> = vec![
            TokenError::Malformed("x".into()).into(),
            TokenError::TamperedSignature.into(),
            TokenError::Expired {
                expired_at: Timestamp::from_secs(1),
            }
            .into(),
            AuthError::InvalidCredentials.into(),
            AuthError::UserNotFound("bob".into()).into(),
            WardenError::MissingCredentials,
        ];

        for err in &rejections {
            assert_eq!(err.status_code(), 401, "{err}");
            assert_eq!(err.code(), "UNAUTHORIZED", "{err}");
        }
    }

    #[test]
    fn test_backend_trouble_is_unavailable() {
        let err: WardenError = AuthError::Backend("down".into()).into();
        assert_eq!(err.status_code(), 503);
        assert_eq!(WardenError::Timeout(Duration::from_secs(5)).code(), "UNAVAILABLE");
    }

    #[test]
    fn test_issuance_failure_is_internal() {
        let err: WardenError = AuthError::Token(TokenError::EmptySubject).into();
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }
}
