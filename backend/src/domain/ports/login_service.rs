//! Driving port for login and bearer-token authentication.
//!
//! Inbound adapters call it to exchange credentials for a token and to turn
//! a presented token back into an identity, without knowing which hasher or
//! signing scheme backs it.

use async_trait::async_trait;

use crate::domain::{AccessClaims, AccessToken, Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue an access token.
    ///
    /// Unknown identifiers and wrong passwords fail identically with
    /// [`crate::domain::ErrorCode::Unauthorized`].
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error>;

    /// Decode and validate a bearer token.
    async fn verify_token(&self, token: &str) -> Result<AccessClaims, Error>;
}
