//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{User, UserCredentials, UserId, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Email or username already taken; `detail` is the database's text.
        UniqueViolation { detail: String } => "{detail}",
    }
}

/// Driven port over the `users` table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user row.
    async fn insert(&self, record: &UserRecord) -> Result<User, UserRepositoryError>;

    /// Look up by email OR username, returning the stored hash alongside.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserCredentials>, UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;
}
