use std::fmt;

use redis::aio::ConnectionManager;

use crate::{RedisConfig, RedisError, RedisResult, TRACING_TARGET_CONNECTION};

/// Shared Redis connection.
///
/// Cloning is cheap; every clone multiplexes over the same managed
/// connection, which reconnects on its own after a drop.
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    config: RedisConfig,
}

impl RedisClient {
    /// Opens the client and establishes the managed connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server cannot be
    /// reached.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CONNECTION,
        fields(redis_url = %config.redis_url_masked())
    )]
    pub async fn new(config: RedisConfig) -> RedisResult<Self> {
        tracing::info!(target: TRACING_TARGET_CONNECTION, "Connecting to Redis");

        let client = redis::Client::open(config.redis_url.as_str()).map_err(|e| {
            tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "Invalid Redis URL");
            RedisError::Config(format!("invalid redis url: {e}"))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            tracing::error!(target: TRACING_TARGET_CONNECTION, error = %e, "Failed to connect to Redis");
            RedisError::Connection(e)
        })?;

        tracing::info!(target: TRACING_TARGET_CONNECTION, "Connected to Redis");
        Ok(Self { conn, config })
    }

    /// Returns a handle to the managed connection.
    #[inline]
    pub fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }

    #[inline]
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

impl fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisClient")
            .field("config", &self.config)
            .field("connection", &"ConnectionManager")
            .finish()
    }
}
