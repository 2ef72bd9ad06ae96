//! Compact signed tokens for Warden.
//!
//! This crate is the cryptographic core: it turns a username and a set of
//! claims into an HS256-signed token, and turns a presented token back into
//! trusted claims, or a precise reason why it can't.
//!
//! - **Keys & config** ([`SigningKey`], [`ExpirationPolicy`], [`TokenConfig`])
//!   — the secret and the token lifetime, validated once at startup.
//! - **Claims** ([`ClaimsSet`], [`Claims`]) — what a token asserts.
//! - **Codec** ([`TokenCodec`], [`Token`]) — issue, verify, inspect.
//! - **Errors** ([`TokenError`], [`ConfigError`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! warden (facade)       ← config from env, login/authorize API
//!     ↕
//! warden-auth           ← login: credentials → roles → token
//!     ↕
//! warden-token (this)   ← sign and verify
//! ```
//!
//! # Example
//!
//! ```rust
//! use warden_token::{Claims, Timestamp, TokenCodec, TokenConfig};
//!
//! let config = TokenConfig::new("a-secret-of-at-least-thirty-two-bytes", 60_000)?;
//! let codec = TokenCodec::new(config);
//!
//! let now = Timestamp::now();
//! let token = codec.issue("alice", Claims::new(), now)?;
//!
//! let claims = codec.verify(token.as_str(), now)?;
//! assert_eq!(claims.subject(), "alice");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod claims;
mod codec;
mod config;
mod error;
mod key;
mod time;

pub use claims::{Claims, ClaimsSet, RESERVED_CLAIMS, ROLES_CLAIM};
pub use codec::{ALGORITHM, TOKEN_TYPE, Token, TokenCodec};
pub use config::{ExpirationPolicy, TokenConfig};
pub use error::{ConfigError, TokenError};
pub use key::SigningKey;
pub use time::Timestamp;
