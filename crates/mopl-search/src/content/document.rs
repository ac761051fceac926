//! Indexed form of a content item.

use jiff::Timestamp;
use mopl_core::resource::{Content, ContentType};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{SearchError, SearchResult};

/// A content item as stored in the search index.
///
/// The document id is the content id, which is also kept in `contentId` so
/// it can serve as the sort tie-break. Counters missing from a document read
/// as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    pub content_id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub review_count: Option<i32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl ContentDocument {
    /// Index mapping for content documents.
    pub fn mapping() -> Value {
        json!({
            "properties": {
                "contentId": { "type": "keyword" },
                "type": { "type": "keyword" },
                "title": { "type": "text" },
                "description": { "type": "text" },
                "thumbnailUrl": { "type": "keyword", "index": false },
                "tags": { "type": "keyword" },
                "reviewCount": { "type": "integer" },
                "averageRating": { "type": "double" },
                "popularityScore": { "type": "double" },
                "createdAt": { "type": "date", "format": "strict_date_optional_time||epoch_millis" }
            }
        })
    }
}

impl From<&Content> for ContentDocument {
    fn from(content: &Content) -> Self {
        Self {
            content_id: content.id.to_string(),
            content_type: content.content_type.as_ref().to_owned(),
            title: content.title.clone(),
            description: content.description.clone(),
            thumbnail_url: content.thumbnail_url.clone(),
            tags: content.tags.clone(),
            review_count: Some(content.review_count),
            average_rating: Some(content.average_rating),
            popularity_score: Some(content.popularity_score),
            created_at: Some(content.created_at),
        }
    }
}

impl TryFrom<ContentDocument> for Content {
    type Error = SearchError;

    fn try_from(document: ContentDocument) -> SearchResult<Self> {
        let id = Uuid::parse_str(&document.content_id)
            .map_err(|e| SearchError::document(&document.content_id, format!("contentId: {e}")))?;

        let content_type = document.content_type.parse::<ContentType>().map_err(|_| {
            SearchError::document(
                &document.content_id,
                format!("unknown type '{}'", document.content_type),
            )
        })?;

        let created_at = document
            .created_at
            .ok_or_else(|| SearchError::document(&document.content_id, "missing createdAt"))?;

        Ok(Self {
            id,
            content_type,
            title: document.title,
            description: document.description,
            thumbnail_url: document.thumbnail_url,
            tags: document.tags,
            average_rating: document.average_rating.unwrap_or_default(),
            review_count: document.review_count.unwrap_or_default(),
            popularity_score: document.popularity_score.unwrap_or_default(),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(content_type: ContentType) -> Content {
        Content {
            id: Uuid::from_u128(42),
            content_type,
            title: "Inception".into(),
            description: "A dream within a dream".into(),
            thumbnail_url: Some("contents/inception.png".into()),
            tags: vec!["sf".into()],
            average_rating: 4.5,
            review_count: 100,
            popularity_score: 85.0,
            created_at: Timestamp::from_second(1_700_000_000).unwrap(),
        }
    }

    #[test]
    fn document_uses_wire_names() {
        let document = ContentDocument::from(&content(ContentType::TvSeries));
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["contentId"], "00000000-0000-0000-0000-00000000002a");
        assert_eq!(json["type"], "tvSeries");
        assert_eq!(json["reviewCount"], 100);
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20Z");
    }

    #[test]
    fn every_type_maps_back() {
        for content_type in [ContentType::Movie, ContentType::TvSeries, ContentType::Sport] {
            let original = content(content_type);
            let restored = Content::try_from(ContentDocument::from(&original)).unwrap();
            assert_eq!(restored, original);
        }
    }

    #[test]
    fn missing_counters_read_as_zero() {
        let document: ContentDocument = serde_json::from_value(json!({
            "contentId": "00000000-0000-0000-0000-00000000002a",
            "type": "movie",
            "title": "Untitled",
            "createdAt": "2024-01-01T00:00:00.000Z"
        }))
        .unwrap();

        let content = Content::try_from(document).unwrap();
        assert_eq!(content.review_count, 0);
        assert_eq!(content.average_rating, 0.0);
        assert_eq!(content.popularity_score, 0.0);
        assert_eq!(content.description, "");
    }

    #[test]
    fn invalid_documents_are_rejected() {
        let mut document = ContentDocument::from(&content(ContentType::Movie));
        document.content_type = "podcast".into();
        assert!(matches!(
            Content::try_from(document),
            Err(SearchError::Document { .. })
        ));

        let mut document = ContentDocument::from(&content(ContentType::Movie));
        document.content_id = "42".into();
        assert!(Content::try_from(document).is_err());
    }
}
