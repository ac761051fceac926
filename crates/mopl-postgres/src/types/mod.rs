//! Database enumeration types for type-safe queries.
//!
//! Each enumeration mirrors a PostgreSQL ENUM type and converts to and from
//! its counterpart in [`mopl_core::resource`].

mod content_type;
mod notification_level;
mod user_role;

pub use content_type::ContentType;
pub use notification_level::NotificationLevel;
pub use user_role::UserRole;
