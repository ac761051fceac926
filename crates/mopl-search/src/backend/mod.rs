//! Search index seam.
//!
//! [`ContentSearchSource`] and [`ContentIndex`] only talk to
//! [`SearchBackend`], served by [`ElasticClient`] in production and by
//! [`MemoryIndex`] in tests.
//!
//! [`ContentSearchSource`]: crate::ContentSearchSource
//! [`ContentIndex`]: crate::ContentIndex
//! [`ElasticClient`]: crate::ElasticClient

mod elastic;
mod memory;

use async_trait::async_trait;
use serde_json::Value;

pub use self::memory::MemoryIndex;
use crate::{ContentDocument, SearchQuery, SearchResponse, SearchResult};

/// Operations on the content index.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn index_exists(&self) -> SearchResult<bool>;

    /// Creates the index with the given field mapping.
    async fn create_index(&self, mapping: &Value) -> SearchResult<()>;

    /// Drops the index, returning whether it existed.
    async fn delete_index(&self) -> SearchResult<bool>;

    /// Indexes a document under its content id, replacing any previous one.
    async fn put_document(&self, document: &ContentDocument) -> SearchResult<()>;

    async fn bulk_put(&self, documents: &[ContentDocument]) -> SearchResult<()>;

    /// Removes a document, returning whether it existed.
    async fn delete_document(&self, content_id: &str) -> SearchResult<bool>;

    async fn bulk_delete(&self, content_ids: &[String]) -> SearchResult<()>;

    async fn search(&self, query: &SearchQuery) -> SearchResult<SearchResponse>;
}
