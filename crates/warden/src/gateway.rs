//! The operations an HTTP layer exposes: log in, and check a token.
//!
//! Warden doesn't ship a web server. [`Warden`] is what a route handler
//! calls: `POST /login` deserializes a [`LoginRequest`], calls
//! [`Warden::login`] and serializes the [`LoginResponse`]; a protected
//! route calls [`Warden::authorize_header`] with the `Authorization`
//! header and either proceeds with the returned claims or answers
//! [`WardenError::status_code`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use warden_auth::{
    AuthSessionService, AuthenticationManager, Clock, SystemClock,
    UserDirectory,
};
use warden_token::{ClaimsSet, Token, TokenCodec};

use crate::{WardenConfig, WardenError};

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Body of a login request: `{"username": "...", "password": "..."}`.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Hand-written so a logged request never shows the password.
impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of a successful login response: `{"token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: Token,
}

// ---------------------------------------------------------------------------
// Bearer extraction
// ---------------------------------------------------------------------------

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
///
/// The scheme name is case-insensitive (RFC 7235). Returns `None` for any
/// other scheme or an empty token.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

// ---------------------------------------------------------------------------
// Warden
// ---------------------------------------------------------------------------

/// Login and token checks, wired to your identity backends.
///
/// Cheap to share: wrap it in an `Arc` and give each request handler a
/// clone. Nothing inside is mutable.
pub struct Warden<A, D, C = SystemClock> {
    sessions: AuthSessionService<A, D, C>,
    login_timeout: Duration,
}

impl<A, D> Warden<A, D, SystemClock>
where
    A: AuthenticationManager,
    D: UserDirectory,
{
    /// Builds a Warden from validated config and the two collaborators.
    pub fn new(config: WardenConfig, authenticator: A, directory: D) -> Self {
        let codec = Arc::new(TokenCodec::new(config.token));
        Self {
            sessions: AuthSessionService::new(codec, authenticator, directory),
            login_timeout: config.login_timeout,
        }
    }
}

impl<A, D, C> Warden<A, D, C>
where
    A: AuthenticationManager,
    D: UserDirectory,
    C: Clock,
{
    /// Replaces the clock used to issue and check tokens.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Warden<A, D, C2> {
        Warden {
            sessions: self.sessions.with_clock(clock),
            login_timeout: self.login_timeout,
        }
    }

    /// The codec, for callers that need `verify`/`is_valid` directly.
    pub fn codec(&self) -> &Arc<TokenCodec> {
        self.sessions.codec()
    }

    /// Logs a user in.
    ///
    /// The whole attempt, both backend calls included, must finish within
    /// the configured login timeout. On timeout the attempt is dropped
    /// mid-flight and no token is issued.
    ///
    /// # Errors
    /// [`WardenError::Auth`] for rejected logins, [`WardenError::Timeout`]
    /// if the backends were too slow.
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<LoginResponse, WardenError> {
        let attempt = self.sessions.login(&request.username, &request.password);

        let token = tokio::time::timeout(self.login_timeout, attempt)
            .await
            .map_err(|_| {
                tracing::warn!(
                    username = %request.username,
                    timeout_ms = self.login_timeout.as_millis() as u64,
                    "login timed out"
                );
                WardenError::Timeout(self.login_timeout)
            })??;

        Ok(LoginResponse { token })
    }

    /// Checks a token for a protected resource and returns its claims.
    ///
    /// # Errors
    /// [`WardenError::Token`] with the precise reason. Map it through
    /// [`WardenError::status_code`] before answering the client.
    pub fn authorize(&self, token: &str) -> Result<ClaimsSet, WardenError> {
        let now = self.sessions.clock().now();
        self.codec().verify(token, now).map_err(|e| {
            tracing::debug!(code = e.code(), error = %e, "access denied");
            WardenError::Token(e)
        })
    }

    /// Like [`authorize`](Self::authorize), starting from the raw
    /// `Authorization` header value (if the request had one).
    ///
    /// # Errors
    /// [`WardenError::MissingCredentials`] if there is no bearer token,
    /// otherwise as `authorize`.
    pub fn authorize_header(
        &self,
        header: Option<&str>,
    ) -> Result<ClaimsSet, WardenError> {
        let token = header
            .and_then(bearer_token)
            .ok_or(WardenError::MissingCredentials)?;
        self.authorize(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extracts_token() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer   abc "), Some("abc"));
        assert_eq!(bearer_token("BEARER abc"), Some("abc"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes_and_empty() {
        assert_eq!(bearer_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer    "), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_login_request_debug_hides_password() {
        let req = LoginRequest::new("alice", "hunter2");
        let printed = format!("{req:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));
    }
}
