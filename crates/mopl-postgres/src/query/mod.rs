//! Repositories that translate page requests into keyset SQL.
//!
//! Each repository is a trait implemented for [`PgConnection`], so any
//! pooled connection can call it directly:
//!
//! ```rust,no_run
//! use mopl_core::pagination::PageRequest;
//! use mopl_core::resource::{User, UserFilter};
//! use mopl_postgres::PgClient;
//! use mopl_postgres::query::UserRepository;
//!
//! # async fn list(client: PgClient) -> mopl_postgres::PgResult<()> {
//! let mut conn = client.get_connection().await?;
//! let page = conn.list_users_page(&PageRequest::<User>::new(UserFilter::default())).await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`PgConnection`]: crate::PgConnection

mod keyset;

mod content;
mod conversation;
mod direct_message;
mod notification;
mod playlist;
mod review;
mod user;

pub use content::ContentRepository;
pub use conversation::ConversationRepository;
pub use direct_message::DirectMessageRepository;
pub use notification::NotificationRepository;
pub use playlist::PlaylistRepository;
pub use review::ReviewRepository;
pub use user::UserRepository;
