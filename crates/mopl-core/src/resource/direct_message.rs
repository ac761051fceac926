//! Messages inside a conversation.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use super::UserSummary;
use crate::record::{PageDefaults, Record, RecordFilter};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: UserSummary,
    pub receiver: UserSummary,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum DirectMessageSortField {
    CreatedAt,
}

impl SortField<DirectMessage> for DirectMessageSortField {
    const ALL: &'static [Self] = &[Self::CreatedAt];
    const RESOURCE: &'static str = "directMessages";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        SortValueKind::Timestamp
    }

    fn extract(self, message: &DirectMessage) -> Option<SortValue> {
        match self {
            Self::CreatedAt => Some(SortValue::from(message.created_at)),
        }
    }
}

/// Messages of one conversation, visible to one of its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DirectMessageFilter {
    pub conversation_id: Uuid,
    pub participant_id: Uuid,
}

impl DirectMessageFilter {
    pub fn new(conversation_id: Uuid, participant_id: Uuid) -> Self {
        Self {
            conversation_id,
            participant_id,
        }
    }
}

impl RecordFilter<DirectMessage> for DirectMessageFilter {
    fn matches(&self, message: &DirectMessage) -> bool {
        message.conversation_id == self.conversation_id
            && (message.sender.user_id == self.participant_id
                || message.receiver.user_id == self.participant_id)
    }
}

impl Record for DirectMessage {
    type Field = DirectMessageSortField;
    type Filter = DirectMessageFilter;

    const DEFAULTS: PageDefaults<DirectMessageSortField> = PageDefaults::new(
        20,
        DirectMessageSortField::CreatedAt,
        SortDirection::Descending,
    );

    fn id(&self) -> Uuid {
        self.id
    }
}
