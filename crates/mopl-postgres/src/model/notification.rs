//! Notification rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource;
use uuid::Uuid;

use crate::schema::notifications;
use crate::types::NotificationLevel;

/// A row of the `notifications` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
    pub id: Uuid,
    pub receiver_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub level: NotificationLevel,
    pub created_at: Timestamp,
    /// Set once the receiver dismisses the notification.
    pub deleted_at: Option<Timestamp>,
}

impl From<Notification> for resource::Notification {
    fn from(row: Notification) -> Self {
        Self {
            id: row.id,
            receiver_id: row.receiver_id,
            title: row.title,
            content: row.content,
            level: row.level.into(),
            created_at: row.created_at.into(),
        }
    }
}
