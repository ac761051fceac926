//! Catalog content rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource;
use uuid::Uuid;

use crate::schema::contents;
use crate::types::ContentType;

/// A row of the `contents` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = contents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Content {
    pub id: Uuid,
    pub content_type: ContentType,
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub tags: Vec<String>,
    /// Mean of all review ratings, 0 without reviews.
    pub average_rating: f64,
    pub review_count: i32,
    pub popularity_score: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Soft-deleted rows are never listed.
    pub deleted_at: Option<Timestamp>,
}

impl From<Content> for resource::Content {
    fn from(row: Content) -> Self {
        Self {
            id: row.id,
            content_type: row.content_type.into(),
            title: row.title,
            description: row.description,
            thumbnail_url: row.thumbnail_url,
            tags: row.tags,
            average_rating: row.average_rating,
            review_count: row.review_count,
            popularity_score: row.popularity_score,
            created_at: row.created_at.into(),
        }
    }
}
