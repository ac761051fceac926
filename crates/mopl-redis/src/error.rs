//! Error types for sorted-set store operations.

/// Error type for all Redis operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "store errors should be handled appropriately"]
pub enum RedisError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to open the client or establish the managed connection.
    #[error("Redis connection error: {0}")]
    Connection(#[source] redis::RedisError),

    /// A command was rejected or the connection dropped while running it.
    #[error("Redis {command} failed: {source}")]
    Command {
        command: &'static str,
        #[source]
        source: redis::RedisError,
    },

    /// A session body could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RedisError {
    /// Creates a command failure.
    pub fn command(command: &'static str, source: redis::RedisError) -> Self {
        Self::Command { command, source }
    }
}

impl From<RedisError> for mopl_core::Error {
    fn from(error: RedisError) -> Self {
        let base = match &error {
            RedisError::Config(_) => mopl_core::Error::configuration(),
            RedisError::Serialization(_) => mopl_core::Error::serialization(),
            RedisError::Connection(_) | RedisError::Command { .. } => {
                mopl_core::Error::store_unavailable()
            }
        };

        let message = error.to_string();
        base.with_message(message).with_source(error)
    }
}

/// Specialized [`Result`] type for Redis operations.
pub type RedisResult<T, E = RedisError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use mopl_core::ErrorKind;

    use super::*;

    #[test]
    fn command_failures_are_store_unavailable() {
        let source = redis::RedisError::from(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        let error: mopl_core::Error = RedisError::command("ZRANGE", source).into();

        assert_eq!(error.kind(), ErrorKind::StoreUnavailable);
        assert!(error.is_transient());
        assert!(error.to_string().contains("ZRANGE"));
    }

    #[test]
    fn config_errors_map_to_configuration() {
        let error: mopl_core::Error = RedisError::Config("empty url".into()).into();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }
}
