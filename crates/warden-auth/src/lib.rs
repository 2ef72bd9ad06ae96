//! Login orchestration for Warden.
//!
//! This crate turns credentials into a token. It does not check passwords
//! or store users itself; it coordinates the backends that do:
//!
//! 1. **Authentication** — is the password right? ([`AuthenticationManager`])
//! 2. **Directory** — who is this user, what roles? ([`UserDirectory`])
//! 3. **Issuance** — sign it ([`warden_token::TokenCodec`])
//!
//! [`AuthSessionService`] runs those three steps for each login and tracks
//! progress through [`LoginStage`].
//!
//! # How it fits in the stack
//!
//! ```text
//! warden (facade)       ← config, timeouts, request/response types
//!     ↕
//! warden-auth (this)    ← login orchestration
//!     ↕
//! warden-token          ← signing and verification
//! ```

#![allow(async_fn_in_trait)]

mod clock;
mod collaborators;
mod error;
mod service;
mod stage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use collaborators::{AuthenticationManager, UserDirectory, UserRecord};
pub use error::AuthError;
pub use service::AuthSessionService;
pub use stage::LoginStage;
