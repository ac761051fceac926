//! Review rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource::{self, UserSummary};
use uuid::Uuid;

use crate::schema::reviews;

/// A row of the `reviews` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Review {
    pub id: Uuid,
    pub content_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    /// Score between 0 and 5.
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Review {
    /// Converts the row into a record with the loaded author.
    pub fn into_record(self, author: UserSummary) -> resource::Review {
        resource::Review {
            id: self.id,
            content_id: self.content_id,
            author,
            text: self.text,
            rating: self.rating,
            created_at: self.created_at.into(),
        }
    }
}
