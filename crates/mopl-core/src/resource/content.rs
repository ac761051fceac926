//! Catalog content.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ContentType {
    Movie,
    TvSeries,
    Sport,
}

/// A movie, series or sports event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub average_rating: f64,
    pub review_count: i32,
    pub popularity_score: f64,
    pub created_at: Timestamp,
}

/// Sort keys accepted when listing content.
///
/// `watcherCount` orders by the review count, `rate` by the average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ContentSortField {
    CreatedAt,
    WatcherCount,
    Rate,
    Popularity,
}

impl SortField<Content> for ContentSortField {
    const ALL: &'static [Self] = &[
        Self::CreatedAt,
        Self::WatcherCount,
        Self::Rate,
        Self::Popularity,
    ];
    const RESOURCE: &'static str = "contents";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        match self {
            Self::CreatedAt => SortValueKind::Timestamp,
            Self::WatcherCount | Self::Rate | Self::Popularity => SortValueKind::Real,
        }
    }

    fn extract(self, content: &Content) -> Option<SortValue> {
        let value = match self {
            Self::CreatedAt => SortValue::from(content.created_at),
            Self::WatcherCount => SortValue::from(content.review_count),
            Self::Rate => SortValue::from(content.average_rating),
            Self::Popularity => SortValue::from(content.popularity_score),
        };
        Some(value)
    }
}

/// Filters accepted when listing content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ContentFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_equal: Option<ContentType>,
    /// Case-insensitive substring of the title or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_like: Option<String>,
}

impl ContentFilter {
    /// Returns the trimmed keyword, if any.
    pub fn keyword(&self) -> Option<&str> {
        normalize_keyword(self.keyword_like.as_deref())
    }
}

impl RecordFilter<Content> for ContentFilter {
    fn matches(&self, content: &Content) -> bool {
        self.type_equal
            .is_none_or(|content_type| content.content_type == content_type)
            && self.keyword().is_none_or(|keyword| {
                contains_ignore_case(&content.title, keyword)
                    || contains_ignore_case(&content.description, keyword)
            })
    }
}

impl Record for Content {
    type Field = ContentSortField;
    type Filter = ContentFilter;

    const DEFAULTS: PageDefaults<ContentSortField> =
        PageDefaults::new(20, ContentSortField::CreatedAt, SortDirection::Descending);

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(content_type: ContentType, title: &str, description: &str) -> Content {
        Content {
            id: Uuid::new_v4(),
            content_type,
            title: title.to_owned(),
            description: description.to_owned(),
            thumbnail_url: None,
            tags: Vec::new(),
            average_rating: 4.5,
            review_count: 42,
            popularity_score: 85.5,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn counters_render_without_fraction() {
        let content = content(ContentType::Movie, "Heat", "Crime");
        let value = ContentSortField::WatcherCount.extract(&content);
        assert_eq!(ContentSortField::WatcherCount.serialize(value.as_ref()), "42");

        let value = ContentSortField::Popularity.extract(&content);
        assert_eq!(ContentSortField::Popularity.serialize(value.as_ref()), "85.5");
    }

    #[test]
    fn keyword_matches_title_or_description() {
        let filter = ContentFilter {
            type_equal: None,
            keyword_like: Some("ocean".into()),
        };
        assert!(filter.matches(&content(ContentType::Movie, "Ocean's Eleven", "Heist")));
        assert!(filter.matches(&content(ContentType::Sport, "Sailing", "Open OCEAN race")));
        assert!(!filter.matches(&content(ContentType::Movie, "Heat", "Crime")));
    }

    #[test]
    fn type_filter_and_wire_names() {
        let filter = ContentFilter {
            type_equal: Some(ContentType::TvSeries),
            keyword_like: Some("   ".into()),
        };
        assert!(filter.matches(&content(ContentType::TvSeries, "Dark", "Time travel")));
        assert!(!filter.matches(&content(ContentType::Movie, "Dark", "Time travel")));
        assert_eq!(ContentType::TvSeries.as_ref(), "tvSeries");
        assert_eq!(
            serde_json::to_value(ContentType::TvSeries).unwrap(),
            serde_json::json!("tvSeries")
        );
    }
}
