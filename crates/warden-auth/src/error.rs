//! Error types for the login layer.

use warden_token::TokenError;

/// Errors that end a login attempt.
///
/// Collaborator errors are passed through unchanged: the service never
/// retries, because a rejected password or an unknown user won't become
/// valid by asking again.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The [`AuthenticationManager`](crate::AuthenticationManager) rejected
    /// the username/password pair.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The [`UserDirectory`](crate::UserDirectory) has no such user.
    /// Can happen when credentials and directory disagree, e.g. an account
    /// deleted between the two lookups.
    #[error("user {0} not found")]
    UserNotFound(String),

    /// A collaborator failed for reasons unrelated to the credentials
    /// themselves (database down, directory unreachable, ...).
    #[error("identity backend failed: {0}")]
    Backend(String),

    /// The token could not be issued.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl AuthError {
    /// Short, stable identifier for logs and metrics labels.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Backend(_) => "BACKEND_FAILURE",
            Self::Token(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_error_keeps_code() {
        let err: AuthError = TokenError::EmptySubject.into();
        assert!(matches!(err, AuthError::Token(TokenError::EmptySubject)));
        assert_eq!(err.code(), "TOKEN_EMPTY_SUBJECT");
    }

    #[test]
    fn test_invalid_credentials_message_does_not_say_which_part() {
        let msg = AuthError::InvalidCredentials.to_string();
        assert_eq!(msg, "invalid username or password");
    }
}
