use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use mopl_core::contains_ignore_case;
use reqwest::StatusCode;
use serde_json::Value;

use super::SearchBackend;
use crate::{
    ContentDocument, SearchError, SearchHit, SearchHits, SearchQuery, SearchResponse,
    SearchResult, TotalHits,
};

#[derive(Debug, Default)]
struct State {
    mapping: Option<Value>,
    documents: HashMap<String, ContentDocument>,
}

/// In-process stand-in for a search index.
///
/// Keyword matching is a case-insensitive substring test on title and
/// description rather than analyzed phrase-prefix matching. Sorting,
/// `search_after` and hit sort values follow the search API.
#[derive(Debug, Clone, Default)]
pub struct MemoryIndex {
    state: Arc<RwLock<State>>,
}

impl MemoryIndex {
    /// Creates a handle to an index that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an existing index holding `documents`.
    pub fn with_documents(documents: impl IntoIterator<Item = ContentDocument>) -> Self {
        let state = State {
            mapping: Some(ContentDocument::mapping()),
            documents: documents
                .into_iter()
                .map(|document| (document.content_id.clone(), document))
                .collect(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .documents
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn missing(operation: &'static str) -> SearchError {
        SearchError::status(operation, StatusCode::NOT_FOUND, "index_not_found_exception".into())
    }
}

fn matches(query: &SearchQuery, document: &ContentDocument) -> bool {
    query
        .type_equal
        .as_ref()
        .is_none_or(|content_type| &document.content_type == content_type)
        && query.keyword.as_deref().is_none_or(|keyword| {
            contains_ignore_case(&document.title, keyword)
                || contains_ignore_case(&document.description, keyword)
        })
}

#[async_trait]
impl SearchBackend for MemoryIndex {
    async fn index_exists(&self) -> SearchResult<bool> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.mapping.is_some())
    }

    async fn create_index(&self, mapping: &Value) -> SearchResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.mapping.is_some() {
            return Err(SearchError::status(
                "create_index",
                StatusCode::BAD_REQUEST,
                "resource_already_exists_exception".into(),
            ));
        }
        state.mapping = Some(mapping.clone());
        Ok(())
    }

    async fn delete_index(&self) -> SearchResult<bool> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.documents.clear();
        Ok(state.mapping.take().is_some())
    }

    async fn put_document(&self, document: &ContentDocument) -> SearchResult<()> {
        self.bulk_put(std::slice::from_ref(document)).await
    }

    async fn bulk_put(&self, documents: &[ContentDocument]) -> SearchResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // Writes create the index on the fly, without an explicit mapping.
        if state.mapping.is_none() {
            state.mapping = Some(Value::Null);
        }
        for document in documents {
            state
                .documents
                .insert(document.content_id.clone(), document.clone());
        }
        Ok(())
    }

    async fn delete_document(&self, content_id: &str) -> SearchResult<bool> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        Ok(state.documents.remove(content_id).is_some())
    }

    async fn bulk_delete(&self, content_ids: &[String]) -> SearchResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        for content_id in content_ids {
            state.documents.remove(content_id);
        }
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> SearchResult<SearchResponse> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if state.mapping.is_none() {
            return Err(Self::missing("search"));
        }

        let mut matched: Vec<&ContentDocument> = state
            .documents
            .values()
            .filter(|document| matches(query, document))
            .collect();
        let total = matched.len() as u64;

        matched.sort_by(|a, b| {
            let b_value = query.sort_field.document_value(b);
            query.compare_position(a, b_value.as_ref(), &b.content_id)
        });

        let after = query.search_after.as_ref().map(|after| {
            (query.sort_field.parse_sort_value(&after.value), after.content_id.as_str())
        });

        let hits = matched
            .into_iter()
            .filter(|document| {
                after.as_ref().is_none_or(|(value, content_id)| {
                    query
                        .compare_position(document, value.as_ref(), content_id)
                        .is_gt()
                })
            })
            .take(query.size as usize)
            .map(|document| {
                let value = query
                    .sort_field
                    .document_value(document)
                    .and_then(|value| query.sort_field.render_sort_value(&value))
                    .unwrap_or(Value::Null);
                SearchHit {
                    id: document.content_id.clone(),
                    source: document.clone(),
                    sort: vec![value, Value::String(document.content_id.clone())],
                }
            })
            .collect();

        Ok(SearchResponse {
            hits: SearchHits {
                total: Some(TotalHits { value: total }),
                hits,
            },
        })
    }
}
