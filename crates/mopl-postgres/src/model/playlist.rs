//! Playlist rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource::{self, UserSummary};
use uuid::Uuid;

use crate::schema::playlists;

/// A row of the `playlists` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = playlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Playlist {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subscriber_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Playlist {
    /// Converts the row into a record with the loaded owner.
    pub fn into_record(self, owner: UserSummary) -> resource::Playlist {
        resource::Playlist {
            id: self.id,
            owner,
            title: self.title,
            description: self.description,
            subscriber_count: self.subscriber_count,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            subscriber_ids: Vec::new(),
        }
    }
}
