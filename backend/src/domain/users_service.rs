//! User registration and lookup service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError, UsersCommand,
    UsersQuery,
};
use crate::domain::{Error, NewUser, PasswordHash, User, UserId, UserRecord};

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::UniqueViolation { detail } => {
            Error::invalid_request(detail).with_details(json!({ "code": "unique_violation" }))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

/// Run a hasher call on the blocking pool.
pub(crate) async fn run_hasher<H, T, F>(hasher: &Arc<H>, op: F) -> Result<T, Error>
where
    H: PasswordHasher + 'static,
    T: Send + 'static,
    F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || op(hasher.as_ref()))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(map_hash_error)
}

/// Service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UsersService<R, H> {
    user_repo: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UsersService<R, H> {
    /// Create a new service over a user repository and password hasher.
    pub fn new(user_repo: Arc<R>, hasher: Arc<H>) -> Self {
        Self { user_repo, hasher }
    }
}

#[async_trait]
impl<R, H> UsersCommand for UsersService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, new_user: NewUser) -> Result<User, Error> {
        let password = Zeroizing::new(new_user.password().to_owned());
        let password_hash: PasswordHash =
            run_hasher(&self.hasher, move |hasher| hasher.hash(password.as_str())).await?;

        let record = UserRecord::from_new_user(&new_user, UserId::random(), password_hash);
        let user = self
            .user_repo
            .insert(&record)
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), role = %user.role(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> UsersQuery for UsersService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn find_by_id(&self, id: &UserId) -> Result<User, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
