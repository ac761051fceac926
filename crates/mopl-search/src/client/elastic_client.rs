use std::fmt;
use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use url::Url;

use crate::{SearchConfig, SearchError, SearchResult, TRACING_TARGET_CLIENT};

struct ElasticClientInner {
    http: Client,
    base_url: Url,
    config: SearchConfig,
}

/// Elasticsearch REST client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ElasticClient {
    inner: Arc<ElasticClientInner>,
}

impl ElasticClient {
    /// Creates a client for the configured cluster.
    ///
    /// No request is made until the first operation.
    #[tracing::instrument(skip_all, target = TRACING_TARGET_CLIENT, fields(index = %config.search_index))]
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let base_url = config.base_url()?;
        let timeout = config.timeout();

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(format!("mopl-search/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SearchError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            base_url = %base_url,
            timeout_ms = timeout.as_millis() as u64,
            "Search client created"
        );

        let inner = ElasticClientInner {
            http,
            base_url,
            config,
        };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    /// Name of the content index.
    #[inline]
    pub fn index(&self) -> &str {
        self.inner.config.search_index.trim()
    }

    /// Builds a request to `{base}/{path}` with credentials attached.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let url = format!("{base}/{}", path.trim_start_matches('/'));

        let builder = self.inner.http.request(method, url);
        match &self.inner.config.search_username {
            Some(username) => {
                builder.basic_auth(username, self.inner.config.search_password.as_deref())
            }
            None => builder,
        }
    }

    /// Sends a request, turning non-success statuses into errors.
    ///
    /// Statuses listed in `allowed` are passed through for the caller.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: RequestBuilder,
        allowed: &[reqwest::StatusCode],
    ) -> SearchResult<Response> {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(target: TRACING_TARGET_CLIENT, operation, error = %e, "Search request failed");
        })?;

        let status = response.status();
        if status.is_success() || allowed.contains(&status) {
            tracing::trace!(target: TRACING_TARGET_CLIENT, operation, status = status.as_u16());
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            target: TRACING_TARGET_CLIENT,
            operation,
            status = status.as_u16(),
            "Search request rejected"
        );
        Err(SearchError::status(operation, status, body))
    }
}

impl fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_join_base_and_path() {
        let client = SearchConfig::new("http://search:9200/").build().unwrap();
        let request = client.request(Method::GET, "/contents/_search").build().unwrap();
        assert_eq!(request.url().as_str(), "http://search:9200/contents/_search");
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn credentials_become_basic_auth() {
        let client = SearchConfig::new("http://search:9200")
            .with_credentials("elastic", "changeme")
            .build()
            .unwrap();
        let request = client.request(Method::HEAD, "contents").build().unwrap();
        assert!(request.headers().contains_key(reqwest::header::AUTHORIZATION));
        assert!(!format!("{client:?}").contains("changeme"));
    }
}
