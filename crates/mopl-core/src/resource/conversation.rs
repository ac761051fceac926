//! Direct-message conversations.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use super::UserSummary;
use crate::record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// A conversation between users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub participants: Vec<UserSummary>,
    pub created_at: Timestamp,
}

impl Conversation {
    /// Returns whether `user_id` takes part in this conversation.
    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Returns the participants other than `user_id`.
    pub fn others(&self, user_id: Uuid) -> impl Iterator<Item = &UserSummary> {
        self.participants.iter().filter(move |p| p.user_id != user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ConversationSortField {
    CreatedAt,
}

impl SortField<Conversation> for ConversationSortField {
    const ALL: &'static [Self] = &[Self::CreatedAt];
    const RESOURCE: &'static str = "conversations";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        SortValueKind::Timestamp
    }

    fn extract(self, conversation: &Conversation) -> Option<SortValue> {
        match self {
            Self::CreatedAt => Some(SortValue::from(conversation.created_at)),
        }
    }
}

/// Filters accepted when listing conversations.
///
/// Conversations are always listed for one participant; the keyword matches
/// the names of the other participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct ConversationFilter {
    pub participant_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_like: Option<String>,
}

impl ConversationFilter {
    pub fn new(participant_id: Uuid) -> Self {
        Self {
            participant_id,
            keyword_like: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword_like = Some(keyword.into());
        self
    }

    pub fn keyword(&self) -> Option<&str> {
        normalize_keyword(self.keyword_like.as_deref())
    }
}

impl RecordFilter<Conversation> for ConversationFilter {
    fn matches(&self, conversation: &Conversation) -> bool {
        conversation.has_participant(self.participant_id)
            && self.keyword().is_none_or(|keyword| {
                conversation
                    .others(self.participant_id)
                    .any(|other| contains_ignore_case(&other.name, keyword))
            })
    }
}

impl Record for Conversation {
    type Field = ConversationSortField;
    type Filter = ConversationFilter;

    const DEFAULTS: PageDefaults<ConversationSortField> = PageDefaults::new(
        20,
        ConversationSortField::CreatedAt,
        SortDirection::Descending,
    );

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_ignores_own_name() {
        let me = UserSummary::new(Uuid::new_v4(), "Minji");
        let other = UserSummary::new(Uuid::new_v4(), "Hyein");
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participants: vec![me.clone(), other],
            created_at: Timestamp::UNIX_EPOCH,
        };

        let filter = ConversationFilter::new(me.user_id);
        assert!(filter.matches(&conversation));
        assert!(filter.clone().with_keyword("hye").matches(&conversation));
        assert!(!filter.with_keyword("minji").matches(&conversation));
        assert!(!ConversationFilter::new(Uuid::new_v4()).matches(&conversation));
    }
}
