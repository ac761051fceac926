//! User accounts.

use jiff::Timestamp;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::record::{PageDefaults, Record, RecordFilter, contains_ignore_case, normalize_keyword};
use crate::sort::{SortDirection, SortField, SortValue, SortValueKind};

/// Account role.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display, EnumString)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub role: UserRole,
    pub locked: bool,
    pub created_at: Timestamp,
}

/// Sort keys accepted when listing users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum UserSortField {
    Name,
    Email,
    CreatedAt,
    IsLocked,
    Role,
}

impl SortField<User> for UserSortField {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Email,
        Self::CreatedAt,
        Self::IsLocked,
        Self::Role,
    ];
    const RESOURCE: &'static str = "users";

    fn name(self) -> &'static str {
        self.into()
    }

    fn kind(self) -> SortValueKind {
        match self {
            Self::Name | Self::Email | Self::Role => SortValueKind::Text,
            Self::CreatedAt => SortValueKind::Timestamp,
            Self::IsLocked => SortValueKind::Bool,
        }
    }

    fn extract(self, user: &User) -> Option<SortValue> {
        let value = match self {
            Self::Name => SortValue::from(user.name.as_str()),
            Self::Email => SortValue::from(user.email.as_str()),
            Self::CreatedAt => SortValue::from(user.created_at),
            Self::IsLocked => SortValue::from(user.locked),
            Self::Role => SortValue::from(user.role.as_ref()),
        };
        Some(value)
    }
}

/// Filters accepted when listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    /// Case-insensitive substring of the email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_like: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_equal: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
}

impl UserFilter {
    /// Returns the trimmed email keyword, if any.
    pub fn email_keyword(&self) -> Option<&str> {
        normalize_keyword(self.email_like.as_deref())
    }
}

impl RecordFilter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.email_keyword()
            .is_none_or(|keyword| contains_ignore_case(&user.email, keyword))
            && self.role_equal.is_none_or(|role| user.role == role)
            && self.is_locked.is_none_or(|locked| user.locked == locked)
    }
}

impl Record for User {
    type Field = UserSortField;
    type Filter = UserFilter;

    const DEFAULTS: PageDefaults<UserSortField> =
        PageDefaults::new(100, UserSortField::Name, SortDirection::Ascending);

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, role: UserRole, locked: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            name: "Jane".to_owned(),
            profile_image_url: None,
            role,
            locked,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn field_names_are_camel_case() {
        let names: Vec<_> = UserSortField::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["name", "email", "createdAt", "isLocked", "role"]);
        assert_eq!(UserSortField::from_name("isLocked").unwrap(), UserSortField::IsLocked);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error = UserSortField::from_name("age").unwrap_err();
        assert_eq!(error.kind(), crate::ErrorKind::InvalidSortField);
    }

    #[test]
    fn filter_combines_conditions() {
        let filter = UserFilter {
            email_like: Some(" EXAMPLE.com ".into()),
            role_equal: Some(UserRole::Admin),
            is_locked: Some(false),
        };

        assert!(filter.matches(&user("root@example.com", UserRole::Admin, false)));
        assert!(!filter.matches(&user("root@example.com", UserRole::User, false)));
        assert!(!filter.matches(&user("root@example.com", UserRole::Admin, true)));
        assert!(!filter.matches(&user("root@other.org", UserRole::Admin, false)));
    }

    #[test]
    fn role_sorts_as_text() {
        let admin = user("a@example.com", UserRole::Admin, false);
        assert_eq!(
            UserSortField::Role.extract(&admin),
            Some(SortValue::Text("ADMIN".into()))
        );
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
    }
}
