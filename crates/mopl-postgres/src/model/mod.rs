//! Database models for the listed tables.
//!
//! Each model is a `Queryable + Selectable` row. Rows that reference users
//! convert into their resource record once the referenced summaries are
//! loaded.

mod content;
mod conversation;
mod direct_message;
mod notification;
mod playlist;
mod review;
mod user;

pub use content::Content;
pub use conversation::{Conversation, ReadStatus};
pub use direct_message::DirectMessage;
pub use notification::Notification;
pub use playlist::Playlist;
pub use review::Review;
pub use user::User;
