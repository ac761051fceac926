#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Embeds all migrations into the final binary.
pub(crate) const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!();

// Tracing target constants for consistent logging.

/// Tracing target for database query operations.
pub const TRACING_TARGET_QUERY: &str = "mopl_postgres::queries";

/// Tracing target for database migration operations.
pub const TRACING_TARGET_MIGRATION: &str = "mopl_postgres::migrations";

/// Tracing target for connection establishment and pool management.
pub const TRACING_TARGET_CONNECTION: &str = "mopl_postgres::connection";

mod client;
mod error;
mod schema;
mod source;

pub mod model;
pub mod query;
pub mod types;

pub use diesel_async::AsyncPgConnection as PgConnection;

pub use crate::client::{
    ConnectionPool, MigrationResult, PgClient, PgConfig, PgConn, PgPoolStatus, PooledConnection,
    get_applied_migrations, run_pending_migrations,
};
pub use crate::error::{PgError, PgResult};
pub use crate::source::PgPageSource;
