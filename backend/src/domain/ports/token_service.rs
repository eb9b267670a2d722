//! Port for issuing and verifying signed bearer tokens.

use crate::domain::{AccessClaims, AccessToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token services.
    pub enum TokenError {
        /// Encoding or signing failed.
        Signing { message: String } => "token signing failed: {message}",
        /// The token is past its expiry.
        Expired => "token expired",
        /// Signature, format or claims are invalid.
        Invalid { message: String } => "token invalid: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying `claims` plus issue and expiry times.
    fn issue(&self, claims: &AccessClaims) -> Result<AccessToken, TokenError>;

    /// Decode and validate a token.
    fn verify(&self, token: &str) -> Result<AccessClaims, TokenError>;
}
