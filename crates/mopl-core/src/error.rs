//! Common error type definitions.

use std::borrow::Cow;

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Storage adapters wrap their native errors (diesel, redis, reqwest) in this
/// type so the engine can carry them without depending on those crates.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while listing a page.
///
/// Every storage back-end reports failures with its own kind, so callers can
/// tell a broken relational query from an unreachable index. None of these is
/// ever converted into an empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A sort field name outside the resource vocabulary was requested.
    InvalidSortField,
    /// The relational store rejected or failed a query.
    QueryFailure,
    /// The sorted-set store could not be reached or returned an error.
    StoreUnavailable,
    /// The search index could not be reached or returned an error.
    IndexUnavailable,
    /// A stored record could not be encoded or decoded.
    Serialization,
    /// Invalid configuration.
    Configuration,
    /// Internal invariant violated.
    Internal,
}

/// A structured error type for pagination operations.
#[derive(Debug, Error)]
#[must_use = "pagination errors should be handled appropriately"]
#[error("{}{}", kind.as_ref(), message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<Cow<'static, str>>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Creates an error for an unknown sort field name.
    pub fn invalid_sort_field(resource: &str, field: &str) -> Self {
        Self::new(ErrorKind::InvalidSortField)
            .with_message(format!("unknown sort field '{field}' for {resource}"))
    }

    /// Creates a new relational query failure.
    pub fn query_failure() -> Self {
        Self::new(ErrorKind::QueryFailure)
    }

    /// Creates a new sorted-set store failure.
    pub fn store_unavailable() -> Self {
        Self::new(ErrorKind::StoreUnavailable)
    }

    /// Creates a new search index failure.
    pub fn index_unavailable() -> Self {
        Self::new(ErrorKind::IndexUnavailable)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new configuration error.
    pub fn configuration() -> Self {
        Self::new(ErrorKind::Configuration)
    }

    /// Creates a new internal error.
    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }

    /// Returns whether retrying the same request could succeed.
    ///
    /// Adapters never retry on their own; callers wrap them when they need to.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::StoreUnavailable | ErrorKind::IndexUnavailable
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::serialization().with_source(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let error = Error::invalid_sort_field("users", "age");
        assert_eq!(
            error.to_string(),
            "invalid_sort_field: unknown sort field 'age' for users"
        );
    }

    #[test]
    fn display_without_message() {
        assert_eq!(Error::store_unavailable().to_string(), "store_unavailable");
    }

    #[test]
    fn backend_failures_are_transient() {
        assert!(Error::index_unavailable().is_transient());
        assert!(Error::store_unavailable().is_transient());
        assert!(!Error::query_failure().is_transient());
        assert!(!Error::invalid_sort_field("users", "x").is_transient());
    }
}
