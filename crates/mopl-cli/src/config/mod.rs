//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── command: Command           # list, migrate, index
//! ├── backends: BackendsConfig   # Back-end per resource
//! ├── postgres: PgConfig         # Relational store
//! ├── redis: RedisConfig         # Sorted-set store
//! └── search: SearchConfig       # Search index
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Connection settings are only validated for the back-ends a run can touch.
//!
//! # Example
//!
//! ```bash
//! mopl --contents-backend search list contents --sort-by rate
//!
//! MOPL_CONTENTS_BACKEND=search SEARCH_URL="http://search:9200" mopl list contents
//! ```

use std::process;

use anyhow::Context;
use clap::Parser;
use mopl_core::{Backend, BackendsConfig};
use mopl_postgres::PgConfig;
use mopl_redis::RedisConfig;
use mopl_search::SearchConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::command::Command;
use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "mopl")]
#[command(about = "Cursor-paginated listings over relational, in-memory, sorted-set and search stores")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Back-end serving each resource.
    #[clap(flatten)]
    pub backends: BackendsConfig,

    /// Relational store connection.
    #[clap(flatten)]
    pub postgres: PgConfig,

    /// Sorted-set store connection and window policy.
    #[clap(flatten)]
    pub redis: RedisConfig,

    /// Search index connection.
    #[clap(flatten)]
    pub search: SearchConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read first so clap's `env` lookups can see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so command output on stdout stays machine-readable.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Returns whether this run can touch `backend`.
    pub fn needs(&self, backend: Backend) -> bool {
        self.command.needs(backend, &self.backends)
    }

    /// Validates the back-end selection and every connection this run needs.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.backends
            .validate()
            .context("invalid backend selection")?;

        if self.needs(Backend::Postgres) {
            self.postgres
                .validate()
                .context("invalid postgres configuration")?;
        }
        if self.needs(Backend::Redis) {
            self.redis
                .validate()
                .context("invalid redis configuration")?;
        }
        if self.needs(Backend::Search) {
            self.search
                .validate()
                .context("invalid search configuration")?;
        }

        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            users = %self.backends.users,
            contents = %self.backends.contents,
            reviews = %self.backends.reviews,
            notifications = %self.backends.notifications,
            playlists = %self.backends.playlists,
            conversations = %self.backends.conversations,
            direct_messages = %self.backends.direct_messages,
            watching_sessions = %self.backends.watching_sessions,
            "Backend selection"
        );

        if self.needs(Backend::Postgres) {
            tracing::debug!(
                target: TRACING_TARGET_CONFIG,
                postgres_url = %self.postgres.database_url_masked(),
                postgres_max_connections = self.postgres.postgres_max_connections,
                "Database configuration"
            );
        }
        if self.needs(Backend::Redis) {
            tracing::debug!(
                target: TRACING_TARGET_CONFIG,
                redis_url = %self.redis.redis_url_masked(),
                overfetch_factor = self.redis.redis_overfetch_factor,
                overfetch_cap = self.redis.redis_overfetch_cap,
                "Sorted-set configuration"
            );
        }
        if self.needs(Backend::Search) {
            tracing::debug!(
                target: TRACING_TARGET_CONFIG,
                search_url = %self.search.search_url,
                search_index = %self.search.search_index,
                "Search configuration"
            );
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_only_needs_the_selected_backend() {
        let cli = Cli::try_parse_from([
            "mopl",
            "--contents-backend",
            "memory",
            "list",
            "contents",
        ])
        .unwrap();

        assert!(cli.needs(Backend::Memory));
        assert!(!cli.needs(Backend::Postgres));
        assert!(!cli.needs(Backend::Redis));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn index_sync_needs_postgres_and_search() {
        let cli = Cli::try_parse_from(["mopl", "index", "sync"]).unwrap();

        assert!(cli.needs(Backend::Postgres));
        assert!(cli.needs(Backend::Search));
        assert!(!cli.needs(Backend::Redis));
    }

    #[test]
    fn rejects_unsupported_backend_pair() {
        let cli = Cli::try_parse_from([
            "mopl",
            "--reviews-backend",
            "redis",
            "list",
            "reviews",
        ])
        .unwrap();

        assert!(cli.validate().is_err());
    }
}
