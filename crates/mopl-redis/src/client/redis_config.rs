//! Redis connection and adapter settings.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::watching_session::OverfetchPolicy;
use crate::{RedisClient, RedisError, RedisResult, TRACING_TARGET_CONNECTION};

/// Redis URL and watching-session window settings.
///
/// ```rust,no_run
/// use mopl_redis::RedisConfig;
///
/// # async fn connect() -> mopl_redis::RedisResult<()> {
/// let client = RedisConfig::new("redis://localhost:6379")
///     .with_overfetch(5, 2000)
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "redis configurations must be used to create clients"]
pub struct RedisConfig {
    /// Redis connection URL
    #[cfg_attr(
        feature = "config",
        arg(long = "redis-url", env = "REDIS_URL", default_value = "redis://localhost:6379")
    )]
    pub redis_url: String,

    /// Multiplier applied to the page size to size the candidate window
    #[cfg_attr(
        feature = "config",
        arg(
            long = "redis-overfetch-factor",
            env = "REDIS_OVERFETCH_FACTOR",
            default_value = "5"
        )
    )]
    pub redis_overfetch_factor: u32,

    /// Upper bound of the candidate window
    #[cfg_attr(
        feature = "config",
        arg(
            long = "redis-overfetch-cap",
            env = "REDIS_OVERFETCH_CAP",
            default_value = "2000"
        )
    )]
    pub redis_overfetch_cap: u32,
}

impl RedisConfig {
    /// Creates a configuration with the default window.
    pub fn new(redis_url: impl Into<String>) -> Self {
        let policy = OverfetchPolicy::default();
        Self {
            redis_url: redis_url.into(),
            redis_overfetch_factor: policy.factor,
            redis_overfetch_cap: policy.cap,
        }
    }

    pub fn with_overfetch(mut self, factor: u32, cap: u32) -> Self {
        self.redis_overfetch_factor = factor;
        self.redis_overfetch_cap = cap;
        self
    }

    /// Returns the candidate window policy.
    #[inline]
    pub fn overfetch_policy(&self) -> OverfetchPolicy {
        OverfetchPolicy::new(self.redis_overfetch_factor, self.redis_overfetch_cap)
    }

    /// Returns the URL with its password replaced by `***`.
    pub fn redis_url_masked(&self) -> String {
        let url = &self.redis_url;
        let authority_start = url.find("://").map_or(0, |pos| pos + 3);
        if let Some(at_pos) = url[authority_start..].find('@').map(|pos| pos + authority_start)
            && let Some(colon_pos) = url[authority_start..at_pos]
                .rfind(':')
                .map(|pos| pos + authority_start)
        {
            let mut masked = url.clone();
            masked.replace_range(colon_pos + 1..at_pos, "***");
            return masked;
        }
        url.clone()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RedisResult<()> {
        if self.redis_url.trim().is_empty() {
            return Err(RedisError::Config("redis_url cannot be empty".to_string()));
        }

        if !self.redis_url.starts_with("redis://")
            && !self.redis_url.starts_with("rediss://")
            && !self.redis_url.starts_with("unix://")
        {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                redis_url = %self.redis_url_masked(),
                "URL may not be a Redis URL"
            );
        }

        if self.redis_overfetch_factor == 0 {
            return Err(RedisError::Config(
                "overfetch_factor must be at least 1".to_string(),
            ));
        }

        if self.redis_overfetch_cap == 0 {
            return Err(RedisError::Config(
                "overfetch_cap must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates the configuration and connects.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the server
    /// cannot be reached.
    pub async fn build(self) -> RedisResult<RedisClient> {
        self.validate()?;
        RedisClient::new(self).await
    }
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("redis_url", &self.redis_url_masked())
            .field("redis_overfetch_factor", &self.redis_overfetch_factor)
            .field("redis_overfetch_cap", &self.redis_overfetch_cap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_is_masked() {
        let config = RedisConfig::new("redis://:hunter2@cache:6379/0");
        assert_eq!(config.redis_url_masked(), "redis://:***@cache:6379/0");
        assert!(!format!("{config:?}").contains("hunter2"));
        assert_eq!(
            RedisConfig::new("redis://cache:6379").redis_url_masked(),
            "redis://cache:6379"
        );
    }

    #[test]
    fn defaults_match_policy() {
        let config = RedisConfig::new("redis://cache:6379");
        assert_eq!(config.overfetch_policy(), OverfetchPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(RedisConfig::new("redis://cache").with_overfetch(0, 10).validate().is_err());
        assert!(RedisConfig::new("redis://cache").with_overfetch(5, 0).validate().is_err());
        assert!(RedisConfig::new(" ").validate().is_err());
    }
}
