//! Shared Diesel error mapping for repository adapters.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error.
pub(super) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    connection(error.into_message())
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }
}

/// Map Diesel errors onto query/connection constructors.
pub(super) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(String) -> E,
    C: Fn(String) -> E,
{
    log_diesel_error(&error);
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => query(info.message().to_owned()),
        other => query(other.to_string()),
    }
}

/// Detail text for unique violations, preferring Postgres' `DETAIL` line.
///
/// Returns `None` for any other error.
pub(super) fn unique_violation_detail(error: &DieselError) -> Option<String> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Some(
            info.details()
                .filter(|detail| !detail.trim().is_empty())
                .unwrap_or_else(|| info.message())
                .to_owned(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Mapped {
        Query(String),
        Connection(String),
    }

    struct Info {
        message: &'static str,
        details: Option<&'static str>,
    }

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.message
        }
        fn details(&self) -> Option<&str> {
            self.details
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            None
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &'static str, details: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info { message, details }))
    }

    fn map(error: DieselError) -> Mapped {
        map_basic_diesel_error(error, Mapped::Query, Mapped::Connection)
    }

    #[rstest]
    fn closed_connection_maps_to_connection() {
        let mapped = map(db_error(DatabaseErrorKind::ClosedConnection, "gone", None));
        assert_eq!(mapped, Mapped::Connection("gone".to_owned()));
    }

    #[rstest]
    fn other_database_errors_map_to_query() {
        let mapped = map(db_error(DatabaseErrorKind::CheckViolation, "price check", None));
        assert_eq!(mapped, Mapped::Query("price check".to_owned()));
    }

    #[rstest]
    fn not_found_maps_to_query() {
        assert!(matches!(map(DieselError::NotFound), Mapped::Query(_)));
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: Mapped = map_basic_pool_error(PoolError::checkout("timed out"), Mapped::Connection);
        assert_eq!(mapped, Mapped::Connection("timed out".to_owned()));
    }

    #[rstest]
    #[case(Some("Key (email)=(a@b.io) already exists."), "Key (email)=(a@b.io) already exists.")]
    #[case(None, "duplicate key value violates unique constraint")]
    #[case(Some("  "), "duplicate key value violates unique constraint")]
    fn unique_violation_prefers_detail(#[case] details: Option<&'static str>, #[case] expected: &str) {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint",
            details,
        );
        assert_eq!(unique_violation_detail(&error).as_deref(), Some(expected));
    }

    #[rstest]
    fn unique_violation_detail_ignores_other_errors() {
        assert!(unique_violation_detail(&DieselError::NotFound).is_none());
    }
}
