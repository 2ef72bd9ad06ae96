//! # Warden
//!
//! Stateless signed-token authentication for APIs.
//!
//! A user logs in once with a username and password and receives a compact
//! HS256 token (a JWT) carrying their name and roles. Every later request
//! presents the token; the server checks the signature and expiry and
//! trusts the claims, with no session table anywhere.
//!
//! This crate ties the layers together: [`WardenConfig`] loads the secret
//! and TTL from the environment, [`Warden`] offers `login` and `authorize`
//! for an HTTP layer to expose, and [`WardenError`] maps every failure to
//! a status code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden::prelude::*;
//!
//! // Implement AuthenticationManager and UserDirectory for your stores, then:
//! // warden::telemetry::init_tracing();
//! // let config = WardenConfig::from_env()?;       // fatal if missing
//! // let warden = Warden::new(config, my_auth, my_directory);
//! //
//! // let LoginResponse { token } = warden
//! //     .login(LoginRequest::new("alice", "correct-pw"))
//! //     .await?;
//! // let claims = warden.authorize(token.as_str())?;
//! ```

mod config;
mod error;
mod gateway;
pub mod telemetry;

pub use config::{
    DEFAULT_LOGIN_TIMEOUT, LOGIN_TIMEOUT_VAR, SECRET_VAR, TTL_VAR, WardenConfig,
};
pub use error::WardenError;
pub use gateway::{LoginRequest, LoginResponse, Warden, bearer_token};

pub use warden_auth as auth;
pub use warden_token as token;

pub mod prelude {
    //! The types most applications need.

    pub use crate::{LoginRequest, LoginResponse, Warden, WardenConfig, WardenError};
    pub use warden_auth::{
        AuthError, AuthenticationManager, Clock, SystemClock, UserDirectory,
        UserRecord,
    };
    pub use warden_token::{
        Claims, ClaimsSet, Timestamp, Token, TokenCodec, TokenConfig, TokenError,
    };
}
