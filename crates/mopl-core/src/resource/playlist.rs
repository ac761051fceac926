//! User-curated playlists.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, IntoStaticStr};
use uuid::Uuid;

use super::UserSummary;
use crate::record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: Uuid,
    pub owner: UserSummary,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subscriber_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Users subscribed to the playlist, read by the subscriber filter.
    ///
    /// Never listed. The relational store leaves it empty and filters on
    /// its subscriber table instead.
    #[serde(default, skip_serializing)]
    pub subscriber_ids: Vec<Uuid>,
}

/// Sort keys accepted when listing playlists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum PlaylistSortField {
    UpdatedAt,
    SubscribeCount,
}

impl SortField<Playlist> for PlaylistSortField {
    const ALL: &'static [Self] = &[Self::UpdatedAt, Self::SubscribeCount];
    const RESOURCE: &'static str = "playlists";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        match self {
            Self::UpdatedAt => SortValueKind::Timestamp,
            Self::SubscribeCount => SortValueKind::Real,
        }
    }

    fn extract(self, playlist: &Playlist) -> Option<SortValue> {
        Some(match self {
            Self::UpdatedAt => SortValue::from(playlist.updated_at),
            Self::SubscribeCount => SortValue::from(playlist.subscriber_count),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PlaylistFilter {
    /// Case-insensitive substring of the title or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword_like: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id_equal: Option<Uuid>,
    /// Keeps only playlists this user subscribes to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber_id_equal: Option<Uuid>,
}

impl PlaylistFilter {
    pub fn keyword(&self) -> Option<&str> {
        normalize_keyword(self.keyword_like.as_deref())
    }
}

impl RecordFilter<Playlist> for PlaylistFilter {
    fn matches(&self, playlist: &Playlist) -> bool {
        self.owner_id_equal
            .is_none_or(|owner_id| playlist.owner.user_id == owner_id)
            && self
                .subscriber_id_equal
                .is_none_or(|subscriber_id| playlist.subscriber_ids.contains(&subscriber_id))
            && self.keyword().is_none_or(|keyword| {
                contains_ignore_case(&playlist.title, keyword)
                    || playlist
                        .description
                        .as_deref()
                        .is_some_and(|description| contains_ignore_case(description, keyword))
            })
    }
}

impl Record for Playlist {
    type Field = PlaylistSortField;
    type Filter = PlaylistFilter;

    const DEFAULTS: PageDefaults<PlaylistSortField> =
        PageDefaults::new(20, PlaylistSortField::UpdatedAt, SortDirection::Descending);

    fn id(&self) -> Uuid {
        self.id
    }
}
