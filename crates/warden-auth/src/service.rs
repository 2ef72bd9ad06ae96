//! The login service: credentials in, signed token out.

use std::sync::Arc;

use warden_token::{Token, TokenCodec};

use crate::{
    AuthError, AuthenticationManager, Clock, LoginStage, SystemClock,
    UserDirectory,
};

/// Turns a username/password pair into a signed token.
///
/// Holds no per-user state. Each call to [`login`](Self::login) is an
/// independent attempt, so one service can serve any number of concurrent
/// logins (wrap it in an `Arc` and hand clones to your request handlers).
///
/// ## Flow
///
/// ```text
/// login(user, pw)
///   ├─ AuthenticationManager::authenticate(user, pw)  → InvalidCredentials?
///   ├─ UserDirectory::load_user(user)                 → UserNotFound?
///   └─ TokenCodec::issue(canonical, {roles}, now)     → Token
/// ```
pub struct AuthSessionService<A, D, C = SystemClock> {
    authenticator: A,
    directory: D,
    codec: Arc<TokenCodec>,
    clock: C,
}

impl<A, D> AuthSessionService<A, D, SystemClock>
where
    A: AuthenticationManager,
    D: UserDirectory,
{
    /// Creates a service that stamps tokens with the system clock.
    pub fn new(codec: Arc<TokenCodec>, authenticator: A, directory: D) -> Self {
        Self {
            authenticator,
            directory,
            codec,
            clock: SystemClock,
        }
    }
}

impl<A, D, C> AuthSessionService<A, D, C>
where
    A: AuthenticationManager,
    D: UserDirectory,
    C: Clock,
{
    /// Replaces the clock used for `iat`/`exp`.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> AuthSessionService<A, D, C2> {
        AuthSessionService {
            authenticator: self.authenticator,
            directory: self.directory,
            codec: self.codec,
            clock,
        }
    }

    /// The codec tokens are issued with. Use it to verify them too.
    pub fn codec(&self) -> &Arc<TokenCodec> {
        &self.codec
    }

    /// The clock tokens are stamped with.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Authenticates the user and issues a token carrying their roles.
    ///
    /// The subject of the token is the directory's canonical username,
    /// not necessarily the string that was typed.
    ///
    /// Dropping the returned future abandons the attempt; no token is
    /// issued and nothing needs cleaning up.
    ///
    /// # Errors
    /// - [`AuthError::InvalidCredentials`] — rejected by the authenticator
    /// - [`AuthError::UserNotFound`] — unknown to the directory
    /// - [`AuthError::Backend`] — a collaborator couldn't answer
    /// - [`AuthError::Token`] — the token couldn't be issued
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Token, AuthError> {
        let mut stage = LoginStage::Received;

        match self.attempt(username, password, &mut stage).await {
            Ok(token) => {
                tracing::info!(%username, "login succeeded");
                Ok(token)
            }
            Err(e) => {
                let failed_at = stage;
                advance(&mut stage, LoginStage::Rejected);
                tracing::warn!(
                    %username,
                    %failed_at,
                    code = e.code(),
                    "login rejected"
                );
                Err(e)
            }
        }
    }

    async fn attempt(
        &self,
        username: &str,
        password: &str,
        stage: &mut LoginStage,
    ) -> Result<Token, AuthError> {
        self.authenticator.authenticate(username, password).await?;
        advance(stage, LoginStage::CredentialsChecked);

        let user = self.directory.load_user(username).await?;
        advance(stage, LoginStage::ClaimsResolved);

        let token =
            self.codec
                .issue(&user.username, user.to_claims(), self.clock.now())?;
        advance(stage, LoginStage::TokenIssued);

        Ok(token)
    }
}

fn advance(stage: &mut LoginStage, next: LoginStage) {
    debug_assert!(
        stage.can_transition_to(next),
        "illegal login transition {stage} -> {next}"
    );
    tracing::debug!(from = %stage, to = %next, "login stage");
    *stage = next;
}
