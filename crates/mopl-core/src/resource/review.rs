//! Content reviews.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use super::UserSummary;
use crate::record::{PageDefaults, Record, RecordFilter};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// A review written by a user about a content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub content_id: Uuid,
    pub author: UserSummary,
    pub text: String,
    pub rating: f64,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ReviewSortField {
    CreatedAt,
    Rating,
}

impl SortField<Review> for ReviewSortField {
    const ALL: &'static [Self] = &[Self::CreatedAt, Self::Rating];
    const RESOURCE: &'static str = "reviews";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        match self {
            Self::CreatedAt => SortValueKind::Timestamp,
            Self::Rating => SortValueKind::Real,
        }
    }

    fn extract(self, review: &Review) -> Option<SortValue> {
        Some(match self {
            Self::CreatedAt => SortValue::from(review.created_at),
            Self::Rating => SortValue::from(review.rating),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<Uuid>,
}

impl ReviewFilter {
    pub fn for_content(content_id: Uuid) -> Self {
        Self {
            content_id: Some(content_id),
        }
    }
}

impl RecordFilter<Review> for ReviewFilter {
    fn matches(&self, review: &Review) -> bool {
        self.content_id.is_none_or(|id| review.content_id == id)
    }
}

impl Record for Review {
    type Field = ReviewSortField;
    type Filter = ReviewFilter;

    const DEFAULTS: PageDefaults<ReviewSortField> =
        PageDefaults::new(20, ReviewSortField::CreatedAt, SortDirection::Descending);

    fn id(&self) -> Uuid {
        self.id
    }
}
