use async_trait::async_trait;
use mopl_core::pagination::{CursorPage, PageRequest};
use mopl_core::resource::{Content, ContentSortField};
use mopl_core::sort::SortField;
use mopl_core::{PageSource, Result};
use serde_json::Value;
use uuid::Uuid;

use super::{IndexField, SearchQuery};
use crate::{ElasticClient, SearchBackend, TRACING_TARGET_QUERY};

/// Pages content through the search index with `search_after`.
#[derive(Debug, Clone)]
pub struct ContentSearchSource<B> {
    backend: B,
}

impl<B: SearchBackend> ContentSearchSource<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl From<ElasticClient> for ContentSearchSource<ElasticClient> {
    fn from(client: ElasticClient) -> Self {
        Self::new(client)
    }
}

/// Cursor parts for the last kept hit.
///
/// Prefers the hit's own sort values and falls back to the document.
fn cursor_after(field: ContentSortField, content: &Content, sort: &[Value]) -> (String, Uuid) {
    let value = sort
        .first()
        .and_then(|value| IndexField::from(field).parse_sort_value(value))
        .or_else(|| field.extract(content));

    let id = sort
        .get(1)
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or(content.id);

    (field.serialize(value.as_ref()), id)
}

#[async_trait]
impl<B: SearchBackend> PageSource<Content> for ContentSearchSource<B> {
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_QUERY,
        fields(sort_by = request.sort_by.name(), limit = request.limit)
    )]
    async fn find_page(&self, request: &PageRequest<Content>) -> Result<CursorPage<Content>> {
        let query = SearchQuery::from_request(request);
        let response = self.backend.search(&query).await?;

        let total_count = response
            .hits
            .total
            .map_or(response.hits.hits.len() as u64, |total| total.value);

        let mut rows = Vec::with_capacity(response.hits.hits.len());
        for hit in response.hits.hits {
            rows.push((Content::try_from(hit.source)?, hit.sort));
        }

        let field = request.sort_by;
        let page = CursorPage::new(
            rows,
            request.limit,
            total_count,
            field.name(),
            request.direction,
            |(content, sort)| cursor_after(field, content, sort),
        )
        .map(|(content, _)| content);

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            returned = page.data.len(),
            has_next = page.has_next,
            total_count,
            "Search page fetched"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mopl_core::memory::MemoryPageSource;
    use mopl_core::resource::{ContentFilter, ContentType};
    use mopl_core::sort::SortDirection;
    use serde_json::json;

    use super::*;
    use crate::{ContentDocument, MemoryIndex};

    fn content(n: u128, content_type: ContentType, title: &str, rating: f64, reviews: i32, minute: i64) -> Content {
        Content {
            id: Uuid::from_u128(n),
            content_type,
            title: title.to_owned(),
            description: format!("{title} description"),
            thumbnail_url: None,
            tags: Vec::new(),
            average_rating: rating,
            review_count: reviews,
            popularity_score: rating * f64::from(reviews),
            created_at: Timestamp::from_second(1_700_000_000 + minute * 60).unwrap(),
        }
    }

    fn fixture() -> Vec<Content> {
        vec![
            content(1, ContentType::Movie, "Heat", 4.5, 10, 0),
            content(2, ContentType::TvSeries, "Dark", 4.0, 10, 1),
            content(3, ContentType::Movie, "Alien", 4.5, 3, 1),
            content(4, ContentType::Sport, "Final", 3.0, 0, 2),
            content(5, ContentType::Movie, "Aliens", 4.0, 7, 3),
            content(6, ContentType::TvSeries, "Dark Matter", 2.5, 7, 3),
            content(7, ContentType::Movie, "Heat Wave", 4.5, 10, 4),
        ]
    }

    fn source() -> ContentSearchSource<MemoryIndex> {
        let documents = fixture().iter().map(ContentDocument::from).collect::<Vec<_>>();
        ContentSearchSource::new(MemoryIndex::with_documents(documents))
    }

    async fn collect_pages(
        source: &dyn PageSource<Content>,
        mut request: PageRequest<Content>,
    ) -> Vec<CursorPage<Content>> {
        let mut pages = Vec::new();
        loop {
            let page = source.find_page(&request).await.unwrap();
            let next = page.has_next;
            request = request.with_cursor(page.next_cursor.clone(), page.next_id_after);
            pages.push(page);
            if !next {
                break;
            }
        }
        pages
    }

    #[tokio::test]
    async fn pages_like_the_memory_store() {
        let search = source();
        let oracle: MemoryPageSource<Content> = fixture().into_iter().collect();

        let filters = [
            ContentFilter::default(),
            ContentFilter {
                type_equal: Some(ContentType::Movie),
                keyword_like: None,
            },
            ContentFilter {
                type_equal: None,
                keyword_like: Some(" dark ".into()),
            },
        ];

        for filter in filters {
            for &field in <ContentSortField as SortField<Content>>::ALL {
                for direction in [SortDirection::Ascending, SortDirection::Descending] {
                    for limit in [1, 2, 3, 7, 10] {
                        let request = PageRequest::new(filter.clone())
                            .with_sort(field, direction)
                            .with_limit(limit);

                        let expected = collect_pages(&oracle, request.clone()).await;
                        let actual = collect_pages(&search, request).await;
                        assert_eq!(actual, expected, "{filter:?} {field:?} {direction} {limit}");
                    }
                }
            }
        }
    }

    #[tokio::test]
    async fn missing_index_is_index_unavailable() {
        let source = ContentSearchSource::new(MemoryIndex::new());
        let error = source
            .find_page(&PageRequest::new(ContentFilter::default()))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), mopl_core::ErrorKind::IndexUnavailable);
    }

    #[test]
    fn cursor_falls_back_to_document() {
        let item = content(3, ContentType::Movie, "Alien", 4.5, 3, 1);

        let (value, id) = cursor_after(ContentSortField::Rate, &item, &[]);
        assert_eq!(value, "4.5");
        assert_eq!(id, item.id);

        let sort = [json!(4.25), json!("00000000-0000-0000-0000-000000000009")];
        let (value, id) = cursor_after(ContentSortField::Rate, &item, &sort);
        assert_eq!(value, "4.25");
        assert_eq!(id, Uuid::from_u128(9));

        let (value, _) = cursor_after(ContentSortField::CreatedAt, &item, &[json!("2023-11-14T22:14:20.000Z")]);
        assert_eq!(value, "2023-11-14T22:14:20Z");
    }
}
