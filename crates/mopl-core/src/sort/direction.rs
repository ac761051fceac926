use std::cmp::Ordering;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Sort order direction.
///
/// The wire form is `ASCENDING` / `DESCENDING`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString
)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum SortDirection {
    /// Ascending order (A-Z, oldest first, smallest first).
    Ascending,
    /// Descending order (Z-A, newest first, largest first).
    #[default]
    Descending,
}

impl SortDirection {
    /// Returns whether the direction is ascending.
    #[inline]
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Ascending)
    }

    /// Returns whether the direction is descending.
    #[inline]
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// Orients an ascending comparison result to this direction.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names() {
        assert_eq!(
            "ASCENDING".parse::<SortDirection>().ok(),
            Some(SortDirection::Ascending)
        );
        assert_eq!(
            "descending".parse::<SortDirection>().ok(),
            Some(SortDirection::Descending)
        );
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn serde_uses_screaming_case() {
        let json = serde_json::to_string(&SortDirection::Ascending).unwrap();
        assert_eq!(json, "\"ASCENDING\"");
    }

    #[test]
    fn apply_reverses_for_descending() {
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(
            SortDirection::Descending.apply(Ordering::Less),
            Ordering::Greater
        );
        assert_eq!(
            SortDirection::Descending.apply(Ordering::Equal),
            Ordering::Equal
        );
    }
}
