//! Credential validation and token issuance.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::users_service::{map_user_repository_error, run_hasher};
use crate::domain::ports::{LoginService, PasswordHasher, TokenError, TokenService, UserRepository};
use crate::domain::{AccessClaims, AccessToken, Error, LoginCredentials, PasswordHash, User};

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            Error::internal(format!("failed to sign access token: {message}"))
        }
        TokenError::Expired => Error::unauthorized("token expired"),
        TokenError::Invalid { .. } => Error::unauthorized("invalid token"),
    }
}

/// Service implementing [`LoginService`].
#[derive(Clone)]
pub struct AuthService<R, H, T> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    decoy_hash: PasswordHash,
}

impl<R, H, T> AuthService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenService,
{
    /// Create a new authentication service.
    ///
    /// `decoy_hash` is verified against when the identifier matches no
    /// account, so unknown and known identifiers cost the same hash work.
    pub fn new(
        user_repo: Arc<R>,
        hasher: Arc<H>,
        tokens: Arc<T>,
        decoy_hash: PasswordHash,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            tokens,
            decoy_hash,
        }
    }

    async fn verify_password(
        &self,
        credentials: &LoginCredentials,
        hash: PasswordHash,
    ) -> Result<bool, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        run_hasher(&self.hasher, move |hasher| hasher.verify(password.as_str(), &hash)).await
    }

    /// Return the user when the identifier exists and the password matches.
    ///
    /// A missing account and a wrong password both yield `Ok(None)`.
    pub async fn validate_credentials(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<User>, Error> {
        let Some(stored) = self
            .user_repo
            .find_by_identifier(credentials.identifier())
            .await
            .map_err(map_user_repository_error)?
        else {
            debug!("login identifier not found");
            self.verify_password(credentials, self.decoy_hash.clone()).await?;
            return Ok(None);
        };

        let matches = self
            .verify_password(credentials, stored.password_hash.clone())
            .await?;
        Ok(matches.then_some(stored.user))
    }

    /// Issue a signed token for an authenticated user.
    pub fn issue_token(&self, user: &User) -> Result<AccessToken, Error> {
        self.tokens
            .issue(&AccessClaims::from(user))
            .map_err(map_token_error)
    }
}

#[async_trait]
impl<R, H, T> LoginService for AuthService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
    T: TokenService,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AccessToken, Error> {
        let user = self
            .validate_credentials(credentials)
            .await?
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        let token = self.issue_token(&user)?;
        info!(user_id = %user.id(), "user logged in");
        Ok(token)
    }

    async fn verify_token(&self, token: &str) -> Result<AccessClaims, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
