//! Direct message rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource::{self, UserSummary};
use uuid::Uuid;

use crate::schema::direct_messages;

/// A row of the `direct_messages` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = direct_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DirectMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: Timestamp,
}

impl DirectMessage {
    /// Converts the row into a record with both loaded parties.
    pub fn into_record(self, sender: UserSummary, receiver: UserSummary) -> resource::DirectMessage {
        resource::DirectMessage {
            id: self.id,
            conversation_id: self.conversation_id,
            sender,
            receiver,
            content: self.content,
            created_at: self.created_at.into(),
        }
    }
}
