//! Live viewer presence.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use super::{ContentSummary, UserSummary};
use crate::record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// A user currently watching a content item.
///
/// Sessions are transient. `created_at` is filled in when the session is
/// first stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WatchingSession {
    pub id: Uuid,
    pub watcher: UserSummary,
    pub content: ContentSummary,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl WatchingSession {
    /// Starts a new session with a fresh id.
    pub fn start(watcher: UserSummary, content: ContentSummary) -> Self {
        Self {
            id: Uuid::now_v7(),
            watcher,
            content,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum WatchingSessionSortField {
    CreatedAt,
}

impl SortField<WatchingSession> for WatchingSessionSortField {
    const ALL: &'static [Self] = &[Self::CreatedAt];
    const RESOURCE: &'static str = "watchingSessions";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        SortValueKind::Timestamp
    }

    fn extract(self, session: &WatchingSession) -> Option<SortValue> {
        match self {
            Self::CreatedAt => session.created_at.map(SortValue::from),
        }
    }
}

/// Viewers of one content item, optionally narrowed by watcher name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct WatchingSessionFilter {
    pub content_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watcher_name_like: Option<String>,
}

impl WatchingSessionFilter {
    pub fn new(content_id: Uuid) -> Self {
        Self {
            content_id,
            watcher_name_like: None,
        }
    }

    pub fn with_watcher_name(mut self, name: impl Into<String>) -> Self {
        self.watcher_name_like = Some(name.into());
        self
    }

    /// Returns the trimmed name keyword, if any.
    pub fn watcher_name(&self) -> Option<&str> {
        normalize_keyword(self.watcher_name_like.as_deref())
    }

    /// Returns whether the session passes the name condition alone.
    ///
    /// Sorted-set adapters use this after hydrating a partition, where the
    /// content condition already holds.
    pub fn matches_watcher(&self, session: &WatchingSession) -> bool {
        self.watcher_name()
            .is_none_or(|name| contains_ignore_case(&session.watcher.name, name))
    }
}

impl RecordFilter<WatchingSession> for WatchingSessionFilter {
    fn matches(&self, session: &WatchingSession) -> bool {
        session.content.id == self.content_id && self.matches_watcher(session)
    }
}

impl Record for WatchingSession {
    type Field = WatchingSessionSortField;
    type Filter = WatchingSessionFilter;

    const DEFAULTS: PageDefaults<WatchingSessionSortField> = PageDefaults::new(
        20,
        WatchingSessionSortField::CreatedAt,
        SortDirection::Ascending,
    );

    fn id(&self) -> Uuid {
        self.id
    }
}
