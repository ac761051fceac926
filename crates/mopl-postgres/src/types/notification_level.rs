//! Notification severity enumeration.

use diesel_derive_enum::DbEnum;
use mopl_core::resource;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Severity of a notification.
///
/// Corresponds to the `NOTIFICATION_LEVEL` PostgreSQL enum.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::NotificationLevel"]
pub enum NotificationLevel {
    #[db_rename = "INFO"]
    #[serde(rename = "INFO")]
    #[default]
    Info,

    #[db_rename = "WARNING"]
    #[serde(rename = "WARNING")]
    Warning,

    #[db_rename = "ERROR"]
    #[serde(rename = "ERROR")]
    Error,
}

impl From<NotificationLevel> for resource::NotificationLevel {
    fn from(level: NotificationLevel) -> Self {
        match level {
            NotificationLevel::Info => Self::Info,
            NotificationLevel::Warning => Self::Warning,
            NotificationLevel::Error => Self::Error,
        }
    }
}

impl From<resource::NotificationLevel> for NotificationLevel {
    fn from(level: resource::NotificationLevel) -> Self {
        match level {
            resource::NotificationLevel::Info => Self::Info,
            resource::NotificationLevel::Warning => Self::Warning,
            resource::NotificationLevel::Error => Self::Error,
        }
    }
}
