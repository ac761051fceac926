//! Embedded schema migrations.

use std::ops::DerefMut;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_async::pooled_connection::PoolableConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::{MIGRATIONS, PgClient, PgError, PgResult, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Wall-clock time spent applying migrations.
    pub duration: Duration,
    /// Versions applied by this run, oldest first.
    pub applied_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns the number of migrations applied by this run.
    #[inline]
    pub fn applied_count(&self) -> usize {
        self.applied_versions.len()
    }

    /// Returns whether the schema was already current.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.applied_versions.is_empty()
    }
}

/// Applies every embedded migration that has not run yet.
///
/// Safe to call on every start-up.
///
/// # Errors
///
/// Returns [`PgError::Migration`] if a migration fails or the blocking task
/// panics.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "Starting database migration");

    let start_time = Instant::now();
    let mut conn = pg.get_pooled_connection().await?;
    log_connection_state(&mut conn, "pre_migrate");

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let results = spawn_blocking(move || {
        let versions = conn
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect());
        (versions, conn)
    })
    .await;

    let duration = start_time.elapsed();
    let (results, mut conn): (Result<Vec<String>, _>, _) = results.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Migration task panicked"
        );
        PgError::Migration(err.into())
    })?;

    log_connection_state(conn.deref_mut(), "post_migrate");
    let applied_versions = results.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            duration = ?duration,
            error = %err,
            "Database migration failed"
        );
        PgError::Migration(err)
    })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = applied_versions.len(),
        "Database migration completed"
    );

    Ok(MigrationResult {
        duration,
        applied_versions,
    })
}

/// Lists the migration versions already recorded in the database.
///
/// # Errors
///
/// Returns [`PgError::Migration`] if the migrations table cannot be read.
#[tracing::instrument(skip(conn), target = TRACING_TARGET_MIGRATION)]
pub async fn get_applied_migrations(conn: &mut AsyncPgConnection) -> PgResult<Vec<String>> {
    #[derive(diesel::QueryableByName)]
    struct MigrationVersion {
        #[diesel(sql_type = diesel::sql_types::Text)]
        version: String,
    }

    let versions = diesel::sql_query("SELECT version FROM __diesel_schema_migrations ORDER BY version")
        .get_results::<MigrationVersion>(conn)
        .await
        .map_err(|e| PgError::Migration(format!("Failed to get applied migrations: {e}").into()))?
        .into_iter()
        .map(|row| row.version)
        .collect();

    Ok(versions)
}

fn log_connection_state(conn: &mut AsyncPgConnection, hook: &'static str) {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            hook,
            "Connection is broken around migrations"
        );
    } else {
        tracing::debug!(target: TRACING_TARGET_MIGRATION, hook, "Connection healthy");
    }
}
