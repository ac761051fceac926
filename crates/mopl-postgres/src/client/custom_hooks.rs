//! Pool lifecycle hooks.
//!
//! Establishment is timed and logged with the password masked. A connection
//! that reports itself broken before reuse is dropped from the pool so the
//! next page query gets a fresh one.

use std::time::Instant;

use deadpool::managed::{HookError, HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::pg_config::mask_url;
use crate::TRACING_TARGET_CONNECTION;

/// Opens a connection for the pool manager.
///
/// Plugged into [`ManagerConfig::custom_setup`].
///
/// [`ManagerConfig::custom_setup`]: diesel_async::pooled_connection::ManagerConfig
pub fn setup_callback<C>(url: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    async move {
        let started = Instant::now();
        let established = C::establish(url).await;
        let elapsed_ms = started.elapsed().as_millis();

        if let Err(err) = &established {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                url = %mask_url(url),
                elapsed_ms,
                error = %err,
                "Could not open database connection"
            );
        } else {
            tracing::debug!(
                target: TRACING_TARGET_CONNECTION,
                url = %mask_url(url),
                elapsed_ms,
                "Opened database connection"
            );
        }

        established
    }
    .boxed()
}

pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    tracing::trace!(
        target: TRACING_TARGET_CONNECTION,
        created = ?metrics.created,
        "Connection joined the pool"
    );
    reject_broken(conn, "post_create", metrics)
}

pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    reject_broken(conn, "pre_recycle", metrics)
}

fn reject_broken(
    conn: &mut AsyncPgConnection,
    hook: &'static str,
    metrics: &Metrics,
) -> HookResult<PoolError> {
    if !conn.is_broken() {
        return Ok(());
    }

    tracing::warn!(
        target: TRACING_TARGET_CONNECTION,
        hook,
        recycle_count = metrics.recycle_count,
        "Discarding broken connection"
    );
    Err(HookError::Message("connection is broken".into()))
}
