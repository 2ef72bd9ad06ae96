//! The two identity backends a login depends on.
//!
//! Warden doesn't store passwords and doesn't own a user database. Both
//! jobs belong to the application (or to an LDAP server, an identity
//! provider, a SQL table, ...). Warden only defines what it needs from
//! them:
//!
//! - [`AuthenticationManager`] — "is this the right password for this user?"
//! - [`UserDirectory`] — "what is this user's canonical name and roles?"
//!
//! Keeping them as traits means production code can plug in a real store,
//! development setups can use an in-memory table, and tests can use
//! mocks, without touching the login logic.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use warden_token::{Claims, ROLES_CLAIM};

use crate::AuthError;

/// Verifies a username/password pair.
///
/// # Trait bounds
///
/// - `Send + Sync` → one instance is shared by every concurrent login.
/// - `'static` → it lives as long as the service that owns it.
///
/// The returned future may be dropped before it completes (a client gave
/// up, or a timeout fired), so implementations must not leave shared
/// state half-updated across an `.await`.
///
/// # Example
///
/// ```rust
/// use warden_auth::{AuthError, AuthenticationManager};
///
/// /// Accepts exactly one hard-coded account.
/// /// Only for demos — never ship plaintext passwords!
/// struct DemoAuthenticator;
///
/// impl AuthenticationManager for DemoAuthenticator {
///     async fn authenticate(
///         &self,
///         username: &str,
///         password: &str,
///     ) -> Result<(), AuthError> {
///         if username == "demo" && password == "demo" {
///             Ok(())
///         } else {
///             Err(AuthError::InvalidCredentials)
///         }
///     }
/// }
/// ```
pub trait AuthenticationManager: Send + Sync + 'static {
    /// Checks the credentials.
    ///
    /// # Returns
    /// - `Ok(())` — the password is correct
    /// - `Err(AuthError::InvalidCredentials)` — it isn't, or the user is
    ///   unknown (don't tell the caller which)
    /// - `Err(AuthError::Backend)` — the check itself couldn't run
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}

/// Looks up who a user is once their credentials are known to be good.
pub trait UserDirectory: Send + Sync + 'static {
    /// Loads a user's canonical name and roles.
    ///
    /// # Returns
    /// - `Ok(UserRecord)` — the user exists
    /// - `Err(AuthError::UserNotFound)` — no such user
    /// - `Err(AuthError::Backend)` — the lookup couldn't run
    fn load_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<UserRecord, AuthError>> + Send;
}

// Shared backends: an `Arc` of a collaborator is itself a collaborator, so
// one store can back several services.

impl<T: AuthenticationManager> AuthenticationManager for Arc<T> {
    fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), AuthError>> + Send {
        (**self).authenticate(username, password)
    }
}

impl<T: UserDirectory> UserDirectory for Arc<T> {
    fn load_user(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<UserRecord, AuthError>> + Send {
        (**self).load_user(username)
    }
}

/// What the directory knows about a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// The canonical username. Becomes the token's `sub`; may differ
    /// from what was typed at login (case, aliases, ...).
    pub username: String,

    /// Role names granted to the user. A `BTreeSet` keeps them unique and
    /// sorted, so the same user always gets the same token payload.
    pub roles: BTreeSet<String>,
}

impl UserRecord {
    /// Creates a record from a username and any iterable of role names.
    pub fn new<I, R>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            username: username.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// The claims this user's token carries besides `sub`/`iat`/`exp`:
    /// `{"roles": [...]}`.
    pub fn to_claims(&self) -> Claims {
        let roles = self.roles.iter().cloned().map(Value::String).collect();
        let mut claims = Claims::new();
        claims.insert(ROLES_CLAIM.to_string(), Value::Array(roles));
        claims
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_record_roles_are_sorted_and_deduplicated() {
        let user = UserRecord::new("alice", ["USER", "ADMIN", "USER"]);
        assert_eq!(
            user.roles.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["ADMIN", "USER"]
        );
    }

    #[test]
    fn test_to_claims_has_roles_array() {
        let user = UserRecord::new("alice", ["USER"]);
        let claims = user.to_claims();
        assert_eq!(claims.get("roles"), Some(&json!(["USER"])));
        assert_eq!(claims.len(), 1);
    }

    #[test]
    fn test_to_claims_without_roles_is_empty_array() {
        let user = UserRecord::new("svc", Vec::<String>::new());
        assert_eq!(user.to_claims().get("roles"), Some(&json!([])));
    }
}
