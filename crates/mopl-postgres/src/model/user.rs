//! User account rows.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use mopl_core::resource::{self, UserSummary};
use uuid::Uuid;

use crate::schema::users;
use crate::types::UserRole;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    /// Unique login address.
    pub email: String,
    pub name: String,
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    /// Whether sign-in is blocked.
    pub locked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Returns the summary embedded in records that reference this user.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.id,
            name: self.name.clone(),
            profile_image_url: self.profile_image_url.clone(),
        }
    }
}

impl From<User> for resource::User {
    fn from(row: User) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            profile_image_url: row.profile_image_url,
            role: row.role.into(),
            locked: row.locked,
            created_at: row.created_at.into(),
        }
    }
}
