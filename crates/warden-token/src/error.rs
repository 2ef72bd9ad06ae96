//! Error types for the token layer.
//!
//! Two enums live here: [`TokenError`] for anything that goes wrong while
//! issuing or verifying a token, and [`ConfigError`] for problems with the
//! signing key or lifetime supplied at startup. They are kept apart because
//! they are handled very differently: a `TokenError` is a per-request
//! rejection, a `ConfigError` means the process must not start serving.

use crate::Timestamp;

/// Errors produced by [`TokenCodec`](crate::TokenCodec).
///
/// The verification variants are deliberately distinct so callers that
/// want diagnostics can tell them apart. An HTTP layer should still answer
/// every one of them with the same 401, otherwise the response itself tells
/// an attacker which check their forgery got past.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token could not be decoded: wrong number of segments, invalid
    /// base64url, an unsupported header, or a payload that isn't a valid
    /// claims object.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The signature does not match the header and payload.
    /// Either the token was modified or it was signed with another key.
    #[error("token signature does not match")]
    TamperedSignature,

    /// The signature is fine but the token's validity window has passed.
    #[error("token expired at {expired_at}")]
    Expired { expired_at: Timestamp },

    /// Tokens must name a subject.
    #[error("token subject must not be empty")]
    EmptySubject,

    /// A caller-supplied claim tried to set one of the registered claims
    /// the codec manages itself (`sub`, `iat`, `exp`).
    #[error("claim '{0}' is reserved and cannot be supplied by the caller")]
    ReservedClaim(String),

    /// The claims could not be serialized to JSON.
    #[error("failed to encode claims: {0}")]
    Encode(#[from] serde_json::Error),
}

impl TokenError {
    /// Short, stable identifier for logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "TOKEN_MALFORMED",
            Self::TamperedSignature => "TOKEN_TAMPERED",
            Self::Expired { .. } => "TOKEN_EXPIRED",
            Self::EmptySubject => "TOKEN_EMPTY_SUBJECT",
            Self::ReservedClaim(_) => "TOKEN_RESERVED_CLAIM",
            Self::Encode(_) => "TOKEN_ENCODE",
        }
    }

    /// Returns `true` for errors raised while checking a presented token,
    /// as opposed to errors raised while issuing one.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Malformed(_) | Self::TamperedSignature | Self::Expired { .. }
        )
    }
}

/// Errors in the startup configuration of the token layer.
///
/// All of these are fatal: a server that can't sign tokens with a sound
/// key must not accept requests.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No signing secret was provided, or it was empty.
    #[error("signing secret is missing")]
    MissingSecret,

    /// The secret is too short to be a safe HMAC-SHA256 key.
    #[error("signing secret is {len} bytes, at least {min} are required")]
    WeakSecret { len: usize, min: usize },

    /// The token lifetime must be a positive number of milliseconds.
    #[error("token ttl must be greater than zero")]
    InvalidTtl,

    /// A required configuration variable is not set.
    #[error("required configuration variable {0} is not set")]
    MissingVar(String),

    /// A configuration variable is set but can't be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidVar { name: String, value: String },
}
