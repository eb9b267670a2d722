//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    Email, PasswordHash, Role, User, UserCredentials, UserId, UserRecord, Username,
};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_detail,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    if let Some(detail) = unique_violation_detail(&error) {
        return UserRepositoryError::unique_violation(detail);
    }
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Validate a stored row back into domain types.
pub(super) fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let email = Email::new(&row.email)
        .map_err(|err| UserRepositoryError::query(format!("stored email invalid: {err}")))?;
    let username = Username::new(&row.username)
        .map_err(|err| UserRepositoryError::query(format!("stored username invalid: {err}")))?;
    let role: Role = row
        .role
        .parse()
        .map_err(|err| UserRepositoryError::query(format!("stored role invalid: {err}")))?;
    Ok(User::new(UserId::from(row.id), email, username, role))
}

fn row_to_credentials(row: UserRow) -> Result<UserCredentials, UserRepositoryError> {
    let user = row_to_user(&row)?;
    Ok(UserCredentials {
        user,
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &UserRecord) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *record.id.as_uuid(),
            email: record.email.as_ref(),
            username: record.username.as_ref(),
            password_hash: record.password_hash.as_str(),
            role: record.role.as_str(),
        };

        let row = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result::<UserRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_user(&row)
    }

    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserCredentials>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::email.eq(identifier).or(users::username.eq(identifier)))
            .order(users::created_at.asc())
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(role: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            username: "ada".to_owned(),
            password_hash: "$argon2id$stub".to_owned(),
            role: role.to_owned(),
        }
    }

    #[rstest]
    fn valid_rows_convert() {
        let stored = row("admin", "ada@example.com");
        let user = row_to_user(&stored).expect("valid row");
        assert_eq!(user.id().as_uuid(), &stored.id);
        assert!(user.role().is_admin());
    }

    #[rstest]
    #[case("owner", "ada@example.com")]
    #[case("user", "not-an-email")]
    fn corrupt_rows_map_to_query_errors(#[case] role: &str, #[case] email: &str) {
        let err = row_to_user(&row(role, email)).expect_err("invalid row");
        assert!(matches!(err, UserRepositoryError::Query { .. }));
    }

    #[rstest]
    fn credentials_keep_stored_hash() {
        let creds = row_to_credentials(row("user", "ada@example.com")).expect("valid row");
        assert_eq!(creds.password_hash.as_str(), "$argon2id$stub");
    }
}
