//! User notifications.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::record::{PageDefaults, Record, RecordFilter};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// Severity of a notification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum NotificationLevel {
    #[default]
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub receiver_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub level: NotificationLevel,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum NotificationSortField {
    CreatedAt,
}

impl SortField<Notification> for NotificationSortField {
    const ALL: &'static [Self] = &[Self::CreatedAt];
    const RESOURCE: &'static str = "notifications";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        SortValueKind::Timestamp
    }

    fn extract(self, notification: &Notification) -> Option<SortValue> {
        match self {
            Self::CreatedAt => Some(SortValue::from(notification.created_at)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct NotificationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<Uuid>,
}

impl NotificationFilter {
    pub fn for_receiver(receiver_id: Uuid) -> Self {
        Self {
            receiver_id: Some(receiver_id),
        }
    }
}

impl RecordFilter<Notification> for NotificationFilter {
    fn matches(&self, notification: &Notification) -> bool {
        self.receiver_id
            .is_none_or(|id| notification.receiver_id == id)
    }
}

impl Record for Notification {
    type Field = NotificationSortField;
    type Filter = NotificationFilter;

    const DEFAULTS: PageDefaults<NotificationSortField> = PageDefaults::new(
        20,
        NotificationSortField::CreatedAt,
        SortDirection::Descending,
    );

    fn id(&self) -> Uuid {
        self.id
    }
}
