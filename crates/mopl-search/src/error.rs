//! Error types for search index operations.

/// Error type for all search operations.
#[derive(Debug, thiserror::Error)]
#[must_use = "search errors should be handled appropriately"]
pub enum SearchError {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a response.
    #[error("Search transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Search request {operation} returned {status}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// A bulk request was accepted but some items failed.
    #[error("Bulk {operation} failed for {failed} of {total} items")]
    Bulk {
        operation: &'static str,
        failed: usize,
        total: usize,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed search response: {0}")]
    Malformed(#[source] serde_json::Error),

    /// A stored document could not be turned back into a record.
    #[error("Invalid document {id}: {reason}")]
    Document { id: String, reason: String },
}

impl SearchError {
    pub(crate) fn status(operation: &'static str, status: reqwest::StatusCode, body: String) -> Self {
        Self::Status {
            operation,
            status: status.as_u16(),
            body,
        }
    }

    pub(crate) fn document(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Document {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

impl From<SearchError> for mopl_core::Error {
    fn from(error: SearchError) -> Self {
        let base = match &error {
            SearchError::Config(_) => mopl_core::Error::configuration(),
            _ => mopl_core::Error::index_unavailable(),
        };

        let message = error.to_string();
        base.with_message(message).with_source(error)
    }
}

/// Specialized [`Result`] type for search operations.
pub type SearchResult<T, E = SearchError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use mopl_core::ErrorKind;

    use super::*;

    #[test]
    fn malformed_responses_are_index_unavailable() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: mopl_core::Error = SearchError::Malformed(source).into();

        assert_eq!(error.kind(), ErrorKind::IndexUnavailable);
        assert!(error.is_transient());
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn status_errors_carry_the_body() {
        let error = SearchError::status(
            "search",
            reqwest::StatusCode::BAD_REQUEST,
            "parse_exception".into(),
        );
        assert!(error.to_string().contains("400"));
        assert!(error.to_string().contains("parse_exception"));

        let error: mopl_core::Error = error.into();
        assert_eq!(error.kind(), ErrorKind::IndexUnavailable);
    }
}
