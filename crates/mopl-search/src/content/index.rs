//! Content index maintenance.

use mopl_core::resource::Content;
use strum::{AsRefStr, Display};
use uuid::Uuid;

use super::ContentDocument;
use crate::{SearchBackend, SearchResult, TRACING_TARGET_INDEX};

/// Outcome of [`ContentIndex::ensure_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum IndexInit {
    /// The index was already there and left untouched.
    Existing,
    /// The index was missing and has been created.
    Created,
    /// The index was dropped and created again.
    Recreated,
}

/// Keeps the content index in sync with the catalog.
#[derive(Debug, Clone)]
pub struct ContentIndex<B> {
    backend: B,
}

impl<B: SearchBackend> ContentIndex<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Creates the index with the content mapping when it is missing.
    ///
    /// With `recreate`, an existing index and all of its documents are
    /// dropped first.
    #[tracing::instrument(skip(self), target = TRACING_TARGET_INDEX)]
    pub async fn ensure_index(&self, recreate: bool) -> SearchResult<IndexInit> {
        let exists = self.backend.index_exists().await?;
        if exists && !recreate {
            tracing::info!(target: TRACING_TARGET_INDEX, "Content index already exists");
            return Ok(IndexInit::Existing);
        }

        if exists {
            let deleted = self.backend.delete_index().await?;
            tracing::warn!(target: TRACING_TARGET_INDEX, deleted, "Recreating content index");
        } else {
            tracing::info!(target: TRACING_TARGET_INDEX, "Content index not found, creating");
        }

        self.backend
            .create_index(&ContentDocument::mapping())
            .await
            .inspect_err(|e| {
                tracing::error!(target: TRACING_TARGET_INDEX, error = %e, "Content index creation failed");
            })?;

        let outcome = if exists {
            IndexInit::Recreated
        } else {
            IndexInit::Created
        };
        tracing::info!(target: TRACING_TARGET_INDEX, %outcome, "Content index ready");
        Ok(outcome)
    }

    /// Indexes one content item.
    pub async fn upsert(&self, content: &Content) -> SearchResult<()> {
        self.backend
            .put_document(&ContentDocument::from(content))
            .await
            .inspect_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_INDEX,
                    content_id = %content.id,
                    error = %e,
                    "Content upsert failed"
                );
            })
    }

    /// Indexes many content items in one bulk request.
    pub async fn upsert_all(&self, contents: &[Content]) -> SearchResult<()> {
        if contents.is_empty() {
            return Ok(());
        }

        let documents: Vec<ContentDocument> = contents.iter().map(ContentDocument::from).collect();
        self.backend.bulk_put(&documents).await?;

        tracing::info!(target: TRACING_TARGET_INDEX, count = documents.len(), "Bulk content upsert completed");
        Ok(())
    }

    /// Removes one content item, returning whether it was indexed.
    pub async fn delete(&self, content_id: Uuid) -> SearchResult<bool> {
        self.backend.delete_document(&content_id.to_string()).await
    }

    /// Removes many content items in one bulk request.
    pub async fn delete_all(&self, content_ids: &[Uuid]) -> SearchResult<()> {
        if content_ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = content_ids.iter().map(Uuid::to_string).collect();
        self.backend.bulk_delete(&ids).await?;

        tracing::info!(target: TRACING_TARGET_INDEX, count = ids.len(), "Bulk content delete completed");
        Ok(())
    }
}
