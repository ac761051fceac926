//! Account role enumeration.

use diesel_derive_enum::DbEnum;
use mopl_core::resource;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of a user account.
///
/// Corresponds to the `USER_ROLE` PostgreSQL enum. Labels are declared in
/// alphabetical order, so ordering by the column matches ordering by the
/// label text.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::UserRole"]
pub enum UserRole {
    /// Administrative account
    #[db_rename = "ADMIN"]
    #[serde(rename = "ADMIN")]
    #[strum(serialize = "ADMIN")]
    Admin,

    /// Regular account
    #[db_rename = "USER"]
    #[serde(rename = "USER")]
    #[strum(serialize = "USER")]
    #[default]
    User,
}

impl From<resource::UserRole> for UserRole {
    fn from(role: resource::UserRole) -> Self {
        match role {
            resource::UserRole::Admin => Self::Admin,
            resource::UserRole::User => Self::User,
        }
    }
}

impl From<UserRole> for resource::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn declaration_order_matches_label_order() {
        let labels: Vec<String> = UserRole::iter().map(|role| role.to_string()).collect();
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn labels_match_core_role_text() {
        for role in UserRole::iter() {
            let core: resource::UserRole = role.into();
            assert_eq!(core.as_ref(), role.to_string());
        }
    }
}
