//! The claims carried inside a token.
//!
//! A token's payload is a flat JSON object. Three registered claims are
//! always present and owned by the codec:
//!
//! | JSON key | meaning                            |
//! |----------|------------------------------------|
//! | `sub`    | subject: the username              |
//! | `iat`    | issued-at, NumericDate             |
//! | `exp`    | expiration, NumericDate            |
//!
//! Everything else (for example `roles`) is an additional claim supplied
//! by whoever asked for the token.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::numeric_date;
use crate::{Timestamp, TokenError};

/// Additional, caller-supplied claims: claim name → JSON value.
pub type Claims = Map<String, Value>;

/// Claim names the codec manages itself. Callers may not supply them.
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Name of the claim holding the user's role names.
pub const ROLES_CLAIM: &str = "roles";

/// The full set of claims embedded in one token.
///
/// Produced by [`TokenCodec::issue`](crate::TokenCodec::issue) and returned,
/// unaltered, by [`TokenCodec::verify`](crate::TokenCodec::verify).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsSet {
    #[serde(rename = "sub")]
    subject: String,

    #[serde(rename = "iat", with = "numeric_date")]
    issued_at: Timestamp,

    #[serde(rename = "exp", with = "numeric_date")]
    expiration: Timestamp,

    /// `flatten` merges these into the same JSON object as the registered
    /// claims instead of nesting them under a key.
    #[serde(flatten)]
    extra: Claims,
}

impl ClaimsSet {
    /// Assembles a claims set, refusing empty subjects and any attempt to
    /// smuggle a registered claim in through `extra`.
    pub(crate) fn new(
        subject: &str,
        issued_at: Timestamp,
        expiration: Timestamp,
        extra: Claims,
    ) -> Result<Self, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if let Some(name) = RESERVED_CLAIMS
            .iter()
            .find(|name| extra.contains_key(**name))
        {
            return Err(TokenError::ReservedClaim((*name).to_string()));
        }
        Ok(Self {
            subject: subject.to_string(),
            issued_at,
            expiration,
            extra,
        })
    }

    /// The `sub` claim.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The `iat` claim.
    pub fn issued_at(&self) -> Timestamp {
        self.issued_at
    }

    /// The `exp` claim.
    pub fn expiration(&self) -> Timestamp {
        self.expiration
    }

    /// Looks up an additional claim by name.
    ///
    /// Registered claims are not in this map; use the typed accessors.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }

    /// All additional claims.
    pub fn claims(&self) -> &Claims {
        &self.extra
    }

    /// Role names from the `roles` claim.
    ///
    /// Missing claim → empty list. Non-string entries are skipped rather
    /// than failing the whole token, since they can't name a role anyway.
    pub fn roles(&self) -> Vec<&str> {
        match self.extra.get(ROLES_CLAIM) {
            Some(Value::Array(items)) => {
                items.iter().filter_map(Value::as_str).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Returns `true` if the `roles` claim contains `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().contains(&role)
    }

    /// A token is expired from its `exp` instant onwards.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expiration
    }

    /// Time left before expiration, zero once expired.
    pub fn remaining_at(&self, now: Timestamp) -> Duration {
        now.until(self.expiration)
    }
}
