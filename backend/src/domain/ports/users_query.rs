//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch a user, failing with not-found when absent.
    async fn find_by_id(&self, id: &UserId) -> Result<User, Error>;
}
