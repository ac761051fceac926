//! Content type enumeration.

use diesel_derive_enum::DbEnum;
use mopl_core::resource;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Kind of catalog entry.
///
/// Corresponds to the `CONTENT_TYPE` PostgreSQL enum.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::ContentType"]
pub enum ContentType {
    #[db_rename = "movie"]
    #[serde(rename = "movie")]
    #[strum(serialize = "movie")]
    Movie,

    #[db_rename = "tvSeries"]
    #[serde(rename = "tvSeries")]
    #[strum(serialize = "tvSeries")]
    TvSeries,

    #[db_rename = "sport"]
    #[serde(rename = "sport")]
    #[strum(serialize = "sport")]
    Sport,
}

impl From<resource::ContentType> for ContentType {
    fn from(content_type: resource::ContentType) -> Self {
        match content_type {
            resource::ContentType::Movie => Self::Movie,
            resource::ContentType::TvSeries => Self::TvSeries,
            resource::ContentType::Sport => Self::Sport,
        }
    }
}

impl From<ContentType> for resource::ContentType {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Movie => Self::Movie,
            ContentType::TvSeries => Self::TvSeries,
            ContentType::Sport => Self::Sport,
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn labels_match_wire_names() {
        for content_type in ContentType::iter() {
            let core: resource::ContentType = content_type.into();
            assert_eq!(core.as_ref(), content_type.to_string());
        }
    }
}
