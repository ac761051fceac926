//! Conversation and read-status rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource::{self, UserSummary};
use uuid::Uuid;

use crate::schema::{conversations, read_statuses};

/// A row of the `conversations` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = conversations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Conversation {
    pub id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    /// Converts the row into a record with its loaded participants.
    pub fn into_record(self, participants: Vec<UserSummary>) -> resource::Conversation {
        resource::Conversation {
            id: self.id,
            participants,
            created_at: self.created_at.into(),
        }
    }
}

/// A row of the `read_statuses` table.
///
/// One row per participant and conversation; the set of rows for a
/// conversation is its participant list.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = read_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReadStatus {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub participant_id: Uuid,
    pub last_read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
