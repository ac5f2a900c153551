//! sqlx error translation for the record store

use application::error::ApplicationError;

/// Collapse a sqlx failure into `ApplicationError::Storage`.
///
/// Constraint and SQL errors keep the SQLite message; pool and I/O failures
/// are prefixed with their kind so logs tell them apart.
pub fn map_sqlx_error(e: sqlx::Error) -> ApplicationError {
    let detail = match e {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => format!("connection pool: {e}"),
        sqlx::Error::Io(io) => format!("I/O: {io}"),
        other => other.to_string(),
    };
    ApplicationError::Storage(detail)
}
