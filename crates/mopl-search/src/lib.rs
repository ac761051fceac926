#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for HTTP client setup and requests.
pub const TRACING_TARGET_CLIENT: &str = "mopl_search::client";

/// Tracing target for search queries.
pub const TRACING_TARGET_QUERY: &str = "mopl_search::query";

/// Tracing target for index creation and document writes.
pub const TRACING_TARGET_INDEX: &str = "mopl_search::index";

mod backend;
mod client;
mod content;
mod error;

pub use crate::backend::{MemoryIndex, SearchBackend};
pub use crate::client::{ElasticClient, SearchConfig};
pub use crate::content::{
    ContentDocument, ContentIndex, ContentSearchSource, IndexField, IndexInit, SearchAfter,
    SearchHit, SearchHits, SearchQuery, SearchResponse, SortOrder, TotalHits,
};
pub use crate::error::{SearchError, SearchResult};
