//! Progress of a single login attempt.

use std::fmt;

/// Where a login attempt currently is.
///
/// Every attempt walks the happy path in order, or drops into `Rejected`
/// from any non-terminal stage:
///
/// ```text
/// Received ──→ CredentialsChecked ──→ ClaimsResolved ──→ TokenIssued
///     │                │                     │
///     └────────────────┴─────────────────────┴──────→ Rejected
/// ```
///
/// Nothing outlives the attempt. The issued token is the only state, and
/// the client holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStage {
    /// The request arrived; nothing has been checked.
    Received,
    /// The authentication manager accepted the credentials.
    CredentialsChecked,
    /// The directory returned the canonical username and roles.
    ClaimsResolved,
    /// A signed token was produced. Terminal.
    TokenIssued,
    /// The attempt failed. Terminal.
    Rejected,
}

impl LoginStage {
    /// The next stage on the happy path, `None` for terminal stages.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::CredentialsChecked),
            Self::CredentialsChecked => Some(Self::ClaimsResolved),
            Self::ClaimsResolved => Some(Self::TokenIssued),
            Self::TokenIssued | Self::Rejected => None,
        }
    }

    /// Returns `true` once the attempt has finished, either way.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::TokenIssued | Self::Rejected)
    }

    /// Returns `true` if moving to `target` is allowed.
    pub fn can_transition_to(self, target: Self) -> bool {
        match target {
            Self::Rejected => !self.is_terminal(),
            _ => self.next() == Some(target),
        }
    }
}

impl fmt::Display for LoginStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Received => write!(f, "Received"),
            Self::CredentialsChecked => write!(f, "CredentialsChecked"),
            Self::ClaimsResolved => write!(f, "ClaimsResolved"),
            Self::TokenIssued => write!(f, "TokenIssued"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}
