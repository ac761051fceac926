//! Which storage back-end serves each resource.

#[cfg(feature = "config")]
use clap::Args;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// A storage back-end able to serve pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    /// Relational store.
    Postgres,
    /// In-process collection.
    Memory,
    /// Sorted-set store.
    Redis,
    /// Full-text search index.
    Search,
}

/// Per-resource back-end selection.
///
/// Not every back-end can serve every resource: the search index only holds
/// content, the sorted-set store only holds watching sessions, and watching
/// sessions have no relational table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BackendsConfig {
    #[cfg_attr(
        feature = "config",
        arg(long = "users-backend", env = "MOPL_USERS_BACKEND", default_value = "postgres")
    )]
    pub users: Backend,

    #[cfg_attr(
        feature = "config",
        arg(long = "contents-backend", env = "MOPL_CONTENTS_BACKEND", default_value = "postgres")
    )]
    pub contents: Backend,

    #[cfg_attr(
        feature = "config",
        arg(long = "reviews-backend", env = "MOPL_REVIEWS_BACKEND", default_value = "postgres")
    )]
    pub reviews: Backend,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "notifications-backend",
            env = "MOPL_NOTIFICATIONS_BACKEND",
            default_value = "postgres"
        )
    )]
    pub notifications: Backend,

    #[cfg_attr(
        feature = "config",
        arg(long = "playlists-backend", env = "MOPL_PLAYLISTS_BACKEND", default_value = "postgres")
    )]
    pub playlists: Backend,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "conversations-backend",
            env = "MOPL_CONVERSATIONS_BACKEND",
            default_value = "postgres"
        )
    )]
    pub conversations: Backend,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "direct-messages-backend",
            env = "MOPL_DIRECT_MESSAGES_BACKEND",
            default_value = "postgres"
        )
    )]
    pub direct_messages: Backend,

    #[cfg_attr(
        feature = "config",
        arg(
            long = "watching-sessions-backend",
            env = "MOPL_WATCHING_SESSIONS_BACKEND",
            default_value = "redis"
        )
    )]
    pub watching_sessions: Backend,
}

impl Default for BackendsConfig {
    fn default() -> Self {
        Self {
            users: Backend::Postgres,
            contents: Backend::Postgres,
            reviews: Backend::Postgres,
            notifications: Backend::Postgres,
            playlists: Backend::Postgres,
            conversations: Backend::Postgres,
            direct_messages: Backend::Postgres,
            watching_sessions: Backend::Redis,
        }
    }
}

impl BackendsConfig {
    /// Serves every resource from process memory.
    pub fn in_memory() -> Self {
        Self {
            users: Backend::Memory,
            contents: Backend::Memory,
            reviews: Backend::Memory,
            notifications: Backend::Memory,
            playlists: Backend::Memory,
            conversations: Backend::Memory,
            direct_messages: Backend::Memory,
            watching_sessions: Backend::Memory,
        }
    }

    pub fn with_contents(mut self, backend: Backend) -> Self {
        self.contents = backend;
        self
    }

    pub fn with_watching_sessions(mut self, backend: Backend) -> Self {
        self.watching_sessions = backend;
        self
    }

    /// Returns whether any resource is served by `backend`.
    pub fn uses(&self, backend: Backend) -> bool {
        self.selections().any(|(_, selected)| selected == backend)
    }

    /// Validates that every resource is assigned a back-end that holds it.
    pub fn validate(&self) -> Result<()> {
        for (resource, backend) in self.selections() {
            let supported = match backend {
                Backend::Memory => true,
                Backend::Postgres => resource != "watchingSessions",
                Backend::Redis => resource == "watchingSessions",
                Backend::Search => resource == "contents",
            };

            if !supported {
                return Err(Error::configuration().with_message(format!(
                    "backend '{backend}' cannot serve {resource}"
                )));
            }
        }

        Ok(())
    }

    fn selections(&self) -> impl Iterator<Item = (&'static str, Backend)> {
        [
            ("users", self.users),
            ("contents", self.contents),
            ("reviews", self.reviews),
            ("notifications", self.notifications),
            ("playlists", self.playlists),
            ("conversations", self.conversations),
            ("directMessages", self.direct_messages),
            ("watchingSessions", self.watching_sessions),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn defaults_are_valid() {
        assert!(BackendsConfig::default().validate().is_ok());
        assert!(BackendsConfig::in_memory().validate().is_ok());
        assert!(
            BackendsConfig::default()
                .with_contents(Backend::Search)
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn rejects_unsupported_pairs() {
        let config = BackendsConfig {
            users: Backend::Search,
            ..BackendsConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
        assert_eq!(
            error.to_string(),
            "configuration: backend 'search' cannot serve users"
        );

        let config = BackendsConfig::default().with_watching_sessions(Backend::Postgres);
        assert!(config.validate().is_err());
    }

    #[test]
    fn backend_names_parse_case_insensitively() {
        assert_eq!("Redis".parse::<Backend>().unwrap(), Backend::Redis);
        assert_eq!(Backend::Search.to_string(), "search");
        assert!(BackendsConfig::default().uses(Backend::Redis));
        assert!(!BackendsConfig::default().uses(Backend::Search));
    }
}
