//! Error types for database operations.

use std::borrow::Cow;

use deadpool::managed::TimeoutType;
use diesel::result::{ConnectionError, Error};
use diesel_async::pooled_connection::PoolError as DieselPoolError;
use diesel_async::pooled_connection::deadpool::PoolError as DeadpoolError;

/// Type-erased error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for all PostgreSQL operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "database errors should be handled appropriately"]
pub enum PgError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Creating, waiting for, or recycling a pooled connection timed out.
    #[error("Database operation timed out")]
    Timeout(TimeoutType),

    /// Failed to establish or maintain a database connection.
    #[error("Database connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Applying schema migrations failed.
    #[error("Database migration error: {0}")]
    Migration(BoxError),

    /// Query execution failed.
    #[error("Database query error: {0}")]
    Query(#[from] Error),

    /// Pool misuse, or a stored value that cannot be mapped onto a record.
    #[error("Unexpected error: {0}")]
    Unexpected(Cow<'static, str>),
}

impl PgError {
    /// Returns whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PgError::Timeout(_) | PgError::Connection(ConnectionError::BadConnection(_))
        )
    }
}

impl From<DeadpoolError> for PgError {
    fn from(value: DeadpoolError) -> Self {
        match value {
            DeadpoolError::Timeout(timeout) => Self::Timeout(timeout),
            DeadpoolError::Backend(DieselPoolError::QueryError(error)) => Self::Query(error),
            DeadpoolError::Backend(DieselPoolError::ConnectionError(error)) => {
                Self::Connection(error)
            }
            DeadpoolError::PostCreateHook(err) => {
                Self::Unexpected(format!("new connection rejected: {err}").into())
            }
            DeadpoolError::NoRuntimeSpecified => Self::Unexpected("pool has no runtime".into()),
            DeadpoolError::Closed => Self::Unexpected("pool is closed".into()),
        }
    }
}

impl From<PgError> for mopl_core::Error {
    fn from(error: PgError) -> Self {
        let message = match &error {
            PgError::Config(_) => "invalid database configuration",
            PgError::Timeout(_) => "database operation timed out",
            PgError::Connection(_) => "database connection failed",
            PgError::Migration(_) => "database migration failed",
            PgError::Query(_) => "database query failed",
            PgError::Unexpected(_) => "unexpected database state",
        };

        let base = match error {
            PgError::Config(_) => mopl_core::Error::configuration(),
            _ => mopl_core::Error::query_failure(),
        };

        base.with_message(message).with_source(error)
    }
}

/// Specialized [`Result`] type for database operations.
pub type PgResult<T, E = PgError> = Result<T, E>;
