//! Shared error mapping for sqlx persistence layer

use application::error::ApplicationError;

/// Map a sqlx error to an application-layer error
///
/// Every failure of the transactional handle, constraint violations included,
/// is a store error.
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    match e {
        sqlx::Error::Database(db_err) => {
            ApplicationError::Store(format!("Database error: {db_err}"))
        },
        sqlx::Error::PoolTimedOut => {
            ApplicationError::Store("Timed out waiting for a database connection".to_string())
        },
        other => ApplicationError::Store(format!("Database error: {other}")),
    }
}
