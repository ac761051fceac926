//! Search request and response shapes.

use std::cmp::Ordering;

use jiff::Timestamp;
use mopl_core::pagination::PageRequest;
use mopl_core::resource::{Content, ContentSortField};
use mopl_core::sort::{SortDirection, SortValue, compare_nullable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};
use strum::{AsRefStr, IntoStaticStr};

use super::ContentDocument;

/// Document field a content sort key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum IndexField {
    CreatedAt,
    PopularityScore,
    AverageRating,
    ReviewCount,
}

impl From<ContentSortField> for IndexField {
    fn from(field: ContentSortField) -> Self {
        match field {
            ContentSortField::CreatedAt => Self::CreatedAt,
            ContentSortField::Popularity => Self::PopularityScore,
            ContentSortField::Rate => Self::AverageRating,
            ContentSortField::WatcherCount => Self::ReviewCount,
        }
    }
}

impl IndexField {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Reads this field from a document.
    pub fn document_value(self, document: &ContentDocument) -> Option<SortValue> {
        match self {
            Self::CreatedAt => document.created_at.map(SortValue::from),
            Self::PopularityScore => Some(document.popularity_score.unwrap_or_default().into()),
            Self::AverageRating => Some(document.average_rating.unwrap_or_default().into()),
            Self::ReviewCount => Some(document.review_count.unwrap_or_default().into()),
        }
    }

    /// Parses a hit's sort value.
    ///
    /// Dates arrive formatted or as epoch milliseconds, numbers as JSON
    /// numbers.
    pub fn parse_sort_value(self, value: &Value) -> Option<SortValue> {
        match (self, value) {
            (Self::CreatedAt, Value::String(text)) => text.parse::<Timestamp>().ok().map(SortValue::from),
            (Self::CreatedAt, Value::Number(millis)) => millis
                .as_i64()
                .and_then(|millis| Timestamp::from_millisecond(millis).ok())
                .map(SortValue::from),
            (_, Value::Number(number)) => number.as_f64().map(SortValue::from),
            _ => None,
        }
    }

    /// Renders a sort value the way the index reports it.
    pub fn render_sort_value(self, value: &SortValue) -> Option<Value> {
        match self {
            Self::CreatedAt => value.as_timestamp().map(|ts| Value::String(ts.to_string())),
            Self::ReviewCount => value.as_i32().map(Value::from),
            Self::PopularityScore | Self::AverageRating => {
                value.as_real().and_then(Number::from_f64).map(Value::Number)
            }
        }
    }

    fn sort_clause(self, order: SortOrder) -> Value {
        let mut clause = Map::new();
        clause.insert("order".into(), json!(order));
        if self == Self::CreatedAt {
            clause.insert("format".into(), json!("strict_date_optional_time"));
        }
        let mut sort = Map::new();
        sort.insert(self.name().to_owned(), Value::Object(clause));
        Value::Object(sort)
    }
}

/// Sort order as the search API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortDirection> for SortOrder {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => Self::Asc,
            SortDirection::Descending => Self::Desc,
        }
    }
}

impl SortOrder {
    pub fn direction(self) -> SortDirection {
        match self {
            Self::Asc => SortDirection::Ascending,
            Self::Desc => SortDirection::Descending,
        }
    }
}

/// Position after which a search resumes.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchAfter {
    pub value: Value,
    pub content_id: String,
}

/// One content search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Exact `type` to keep.
    pub type_equal: Option<String>,
    /// Prefix phrase matched against title and description.
    pub keyword: Option<String>,
    pub sort_field: IndexField,
    pub order: SortOrder,
    pub size: u32,
    pub search_after: Option<SearchAfter>,
}

impl SearchQuery {
    /// Translates a page request, asking for one hit beyond the limit.
    ///
    /// A cursor whose value cannot be rendered for the field is ignored, so
    /// the search starts from the top.
    pub fn from_request(request: &PageRequest<Content>) -> Self {
        let sort_field = IndexField::from(request.sort_by);
        let search_after = request.decoded_cursor().and_then(|cursor| {
            Some(SearchAfter {
                value: sort_field.render_sort_value(&cursor.value)?,
                content_id: cursor.id_after.to_string(),
            })
        });

        Self {
            type_equal: request
                .filter
                .type_equal
                .map(|content_type| content_type.as_ref().to_owned()),
            keyword: request.filter.keyword().map(str::to_owned),
            sort_field,
            order: request.direction.into(),
            size: request.fetch_limit(),
            search_after,
        }
    }

    /// Builds the `_search` request body.
    pub fn to_body(&self) -> Value {
        let mut filter = Vec::new();
        if let Some(content_type) = &self.type_equal {
            filter.push(json!({ "term": { "type": content_type } }));
        }

        let mut must = Vec::new();
        if let Some(keyword) = &self.keyword {
            must.push(json!({
                "multi_match": {
                    "query": keyword,
                    "fields": ["title", "description"],
                    "type": "phrase_prefix"
                }
            }));
        }

        let mut body = json!({
            "query": { "bool": { "filter": filter, "must": must } },
            "sort": [
                self.sort_field.sort_clause(self.order),
                { "contentId": { "order": self.order } }
            ],
            "size": self.size,
            "track_total_hits": true
        });

        if let Some(after) = &self.search_after {
            body["search_after"] = json!([after.value, after.content_id]);
        }
        body
    }

    /// Compares a document against a `(value, contentId)` position in
    /// query order.
    pub(crate) fn compare_position(
        &self,
        document: &ContentDocument,
        value: Option<&SortValue>,
        content_id: &str,
    ) -> Ordering {
        let own = self.sort_field.document_value(document);
        let ordering = compare_nullable(own.as_ref(), value)
            .then_with(|| document.content_id.as_str().cmp(content_id));
        self.order.direction().apply(ordering)
    }
}

/// `_search` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub total: Option<TotalHits>,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: ContentDocument,
    #[serde(default)]
    pub sort: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use mopl_core::resource::{ContentFilter, ContentType};
    use uuid::Uuid;

    use super::*;

    fn page_request(field: ContentSortField, direction: SortDirection) -> PageRequest<Content> {
        PageRequest::new(ContentFilter::default())
            .with_sort(field, direction)
            .with_limit(20)
    }

    #[test]
    fn first_page_body() {
        let mut request = page_request(ContentSortField::CreatedAt, SortDirection::Descending);
        request.filter.type_equal = Some(ContentType::TvSeries);
        request.filter.keyword_like = Some("  breaking ".into());

        let body = SearchQuery::from_request(&request).to_body();
        assert_eq!(
            body,
            json!({
                "query": { "bool": {
                    "filter": [{ "term": { "type": "tvSeries" } }],
                    "must": [{ "multi_match": {
                        "query": "breaking",
                        "fields": ["title", "description"],
                        "type": "phrase_prefix"
                    } }]
                } },
                "sort": [
                    { "createdAt": { "order": "desc", "format": "strict_date_optional_time" } },
                    { "contentId": { "order": "desc" } }
                ],
                "size": 21,
                "track_total_hits": true
            })
        );
    }

    #[test]
    fn cursor_becomes_search_after() {
        let request = page_request(ContentSortField::WatcherCount, SortDirection::Ascending)
            .with_cursor(Some("42".into()), Some(Uuid::from_u128(7)));

        let body = SearchQuery::from_request(&request).to_body();
        assert_eq!(body["sort"][0], json!({ "reviewCount": { "order": "asc" } }));
        assert_eq!(
            body["search_after"],
            json!([42, "00000000-0000-0000-0000-000000000007"])
        );
        assert!(body["query"]["bool"]["filter"].as_array().unwrap().is_empty());
    }

    #[test]
    fn unusable_cursor_starts_from_top() {
        let request = page_request(ContentSortField::Rate, SortDirection::Ascending)
            .with_cursor(Some("high".into()), Some(Uuid::from_u128(7)));
        assert_eq!(SearchQuery::from_request(&request).search_after, None);

        let request = page_request(ContentSortField::WatcherCount, SortDirection::Ascending)
            .with_cursor(Some("4.5".into()), Some(Uuid::from_u128(7)));
        assert_eq!(SearchQuery::from_request(&request).search_after, None);
    }

    #[test]
    fn sort_values_parse_per_field() {
        let created = IndexField::CreatedAt
            .parse_sort_value(&json!("2023-11-14T22:13:20.000Z"))
            .unwrap();
        assert_eq!(created.to_cursor(), "2023-11-14T22:13:20Z");
        assert_eq!(
            IndexField::CreatedAt.parse_sort_value(&json!(1_700_000_000_000_i64)),
            Some(created)
        );
        assert_eq!(
            IndexField::ReviewCount.parse_sort_value(&json!(42)).unwrap().to_cursor(),
            "42"
        );
        assert_eq!(IndexField::AverageRating.parse_sort_value(&json!("x")), None);
    }

    #[test]
    fn response_shape() {
        let response: SearchResponse = serde_json::from_value(json!({
            "took": 3,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{
                    "_index": "contents",
                    "_id": "00000000-0000-0000-0000-000000000001",
                    "_source": {
                        "contentId": "00000000-0000-0000-0000-000000000001",
                        "type": "movie",
                        "title": "Heat",
                        "createdAt": "2024-01-01T00:00:00Z"
                    },
                    "sort": ["2024-01-01T00:00:00.000Z", "00000000-0000-0000-0000-000000000001"]
                }]
            }
        }))
        .unwrap();

        assert_eq!(response.hits.total, Some(TotalHits { value: 1 }));
        assert_eq!(response.hits.hits[0].sort.len(), 2);
        assert_eq!(response.hits.hits[0].source.title, "Heat");
    }
}
