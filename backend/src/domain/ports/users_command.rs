//! Driving port for user registration.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Hash the password and persist the account.
    async fn register(&self, new_user: NewUser) -> Result<User, Error>;
}
