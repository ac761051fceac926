use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};

use super::SearchBackend;
use crate::{
    ContentDocument, ElasticClient, SearchError, SearchQuery, SearchResponse, SearchResult,
    TRACING_TARGET_INDEX, TRACING_TARGET_QUERY,
};

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
    #[serde(default)]
    items: Vec<Value>,
}

impl BulkResponse {
    /// Counts items whose status is not a success.
    ///
    /// Deleting a missing document reports 404 and counts as done.
    fn failed(&self) -> usize {
        self.items
            .iter()
            .filter_map(|item| item.as_object()?.values().next()?.get("status")?.as_u64())
            .filter(|status| !(200..300).contains(status) && *status != 404)
            .count()
    }
}

impl ElasticClient {
    async fn bulk(&self, operation: &'static str, body: String, total: usize) -> SearchResult<()> {
        let request = self
            .request(Method::POST, "_bulk")
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(body);

        let text = self.send(operation, request, &[]).await?.text().await?;
        let response: BulkResponse = serde_json::from_str(&text).map_err(SearchError::Malformed)?;

        let failed = if response.errors { response.failed() } else { 0 };
        if failed > 0 {
            tracing::warn!(target: TRACING_TARGET_INDEX, operation, failed, total, "Bulk request partly failed");
            return Err(SearchError::Bulk {
                operation,
                failed,
                total,
            });
        }
        Ok(())
    }
}

fn bulk_line(body: &mut String, line: &Value) {
    body.push_str(&line.to_string());
    body.push('\n');
}

#[async_trait]
impl SearchBackend for ElasticClient {
    async fn index_exists(&self) -> SearchResult<bool> {
        let request = self.request(Method::HEAD, self.index());
        let response = self.send("index_exists", request, &[StatusCode::NOT_FOUND]).await?;
        Ok(response.status() != StatusCode::NOT_FOUND)
    }

    async fn create_index(&self, mapping: &Value) -> SearchResult<()> {
        let request = self
            .request(Method::PUT, self.index())
            .json(&json!({ "mappings": mapping }));
        self.send("create_index", request, &[]).await?;
        Ok(())
    }

    async fn delete_index(&self) -> SearchResult<bool> {
        let request = self.request(Method::DELETE, self.index());
        let response = self.send("delete_index", request, &[StatusCode::NOT_FOUND]).await?;
        Ok(response.status() != StatusCode::NOT_FOUND)
    }

    async fn put_document(&self, document: &ContentDocument) -> SearchResult<()> {
        let path = format!("{}/_doc/{}", self.index(), document.content_id);
        let request = self.request(Method::PUT, &path).json(document);
        self.send("put_document", request, &[]).await?;
        Ok(())
    }

    async fn bulk_put(&self, documents: &[ContentDocument]) -> SearchResult<()> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for document in documents {
            bulk_line(
                &mut body,
                &json!({ "index": { "_index": self.index(), "_id": document.content_id } }),
            );
            bulk_line(&mut body, &json!(document));
        }
        self.bulk("bulk_put", body, documents.len()).await
    }

    async fn delete_document(&self, content_id: &str) -> SearchResult<bool> {
        let path = format!("{}/_doc/{content_id}", self.index());
        let request = self.request(Method::DELETE, &path);
        let response = self.send("delete_document", request, &[StatusCode::NOT_FOUND]).await?;
        Ok(response.status() != StatusCode::NOT_FOUND)
    }

    async fn bulk_delete(&self, content_ids: &[String]) -> SearchResult<()> {
        if content_ids.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for content_id in content_ids {
            bulk_line(
                &mut body,
                &json!({ "delete": { "_index": self.index(), "_id": content_id } }),
            );
        }
        self.bulk("bulk_delete", body, content_ids.len()).await
    }

    async fn search(&self, query: &SearchQuery) -> SearchResult<SearchResponse> {
        let body = query.to_body();
        tracing::trace!(target: TRACING_TARGET_QUERY, body = %body, "Search request");

        let path = format!("{}/_search", self.index());
        let request = self.request(Method::POST, &path).json(&body);
        let text = self.send("search", request, &[]).await?.text().await?;

        serde_json::from_str(&text).map_err(SearchError::Malformed)
    }
}
