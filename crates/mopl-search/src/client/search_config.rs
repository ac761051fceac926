//! Search cluster settings.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ElasticClient, SearchError, SearchResult};

/// Default request timeout: 10 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default index holding content documents.
pub const DEFAULT_INDEX: &str = "contents";

/// Cluster URL, index name and credentials.
///
/// ```rust,no_run
/// use mopl_search::SearchConfig;
///
/// let client = SearchConfig::new("http://localhost:9200")
///     .with_index("contents")
///     .build()?;
/// # Ok::<(), mopl_search::SearchError>(())
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "search configurations must be used to create clients"]
pub struct SearchConfig {
    /// Elasticsearch base URL
    #[cfg_attr(
        feature = "config",
        arg(long = "search-url", env = "SEARCH_URL", default_value = "http://localhost:9200")
    )]
    pub search_url: String,

    /// Name of the content index
    #[cfg_attr(
        feature = "config",
        arg(long = "search-index", env = "SEARCH_INDEX", default_value = DEFAULT_INDEX)
    )]
    pub search_index: String,

    /// Basic-auth user name
    #[cfg_attr(feature = "config", arg(long = "search-username", env = "SEARCH_USERNAME"))]
    pub search_username: Option<String>,

    /// Basic-auth password
    #[cfg_attr(feature = "config", arg(long = "search-password", env = "SEARCH_PASSWORD"))]
    pub search_password: Option<String>,

    /// Request timeout, in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "search-timeout-secs", env = "SEARCH_TIMEOUT_SECS")
    )]
    pub search_timeout_secs: Option<u64>,
}

impl SearchConfig {
    pub fn new(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
            search_index: DEFAULT_INDEX.to_owned(),
            search_username: None,
            search_password: None,
            search_timeout_secs: None,
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.search_index = index.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.search_username = Some(username.into());
        self.search_password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Returns the request timeout, using the default when unset or zero.
    pub fn timeout(&self) -> Duration {
        self.search_timeout_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_secs)
    }

    /// Parses the base URL.
    pub fn base_url(&self) -> SearchResult<Url> {
        let url = Url::parse(self.search_url.trim())
            .map_err(|e| SearchError::Config(format!("invalid search_url: {e}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(SearchError::Config(format!(
                "search_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(url)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SearchResult<()> {
        self.base_url()?;

        let index = self.search_index.trim();
        if index.is_empty() {
            return Err(SearchError::Config("search_index cannot be empty".into()));
        }
        if index != index.to_lowercase() || index.contains(['/', '\\', '*', '?', '"', ' ', ',', '#']) {
            return Err(SearchError::Config(format!(
                "search_index '{index}' is not a valid index name"
            )));
        }

        if self.search_password.is_some() && self.search_username.is_none() {
            return Err(SearchError::Config(
                "search_password requires search_username".into(),
            ));
        }

        Ok(())
    }

    /// Validates the configuration and builds a client.
    pub fn build(self) -> SearchResult<ElasticClient> {
        self.validate()?;
        ElasticClient::new(self)
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("search_url", &self.search_url)
            .field("search_index", &self.search_index)
            .field("search_username", &self.search_username)
            .field("search_password", &self.search_password.as_ref().map(|_| "***"))
            .field("search_timeout_secs", &self.search_timeout_secs)
            .finish()
    }
}
