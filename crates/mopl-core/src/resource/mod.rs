//! Listable resources and their sort vocabularies.
//!
//! Each resource defines its record type, a closed [`SortField`] enum, a
//! filter bag implementing [`RecordFilter`], and its paging defaults.
//!
//! [`SortField`]: crate::sort::SortField
//! [`RecordFilter`]: crate::RecordFilter

mod content;
mod conversation;
mod direct_message;
mod notification;
mod playlist;
mod review;
mod summary;
mod user;
mod watching_session;

pub use content::{Content, ContentFilter, ContentSortField, ContentType};
pub use conversation::{Conversation, ConversationFilter, ConversationSortField};
pub use direct_message::{DirectMessage, DirectMessageFilter, DirectMessageSortField};
pub use notification::{
    Notification, NotificationFilter, NotificationLevel, NotificationSortField,
};
pub use playlist::{Playlist, PlaylistFilter, PlaylistSortField};
pub use review::{Review, ReviewFilter, ReviewSortField};
pub use summary::{ContentSummary, UserSummary};
pub use user::{User, UserFilter, UserRole, UserSortField};
pub use watching_session::{
    WatchingSession, WatchingSessionFilter, WatchingSessionSortField,
};
