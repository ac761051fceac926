//! Sort-field descriptors.

use std::fmt;

use super::{SortValue, SortValueKind};
use crate::{Error, Result};

/// A closed vocabulary of sort keys for one record type.
///
/// Implementors are plain `Copy` enums. Each variant knows how to pull its
/// value out of a record and which [`SortValueKind`] it produces, which fixes
/// the cursor text format for that field. Back-end crates map variants to
/// their native representation (column, index field) with an exhaustive
/// `match`, so an unmapped field fails to compile rather than at runtime.
pub trait SortField<R>: fmt::Debug + Copy + Eq + Send + Sync + 'static {
    /// Every variant, in declaration order.
    const ALL: &'static [Self];

    /// Name of the resource this vocabulary belongs to, used in errors.
    const RESOURCE: &'static str;

    /// Canonical field name echoed back as `sortBy`.
    fn name(self) -> &'static str;

    /// Type of value this field produces.
    fn kind(self) -> SortValueKind;

    /// Extracts the sort value from a record.
    fn extract(self, record: &R) -> Option<SortValue>;

    /// Renders a value as cursor text; a missing value renders as `""`.
    fn serialize(self, value: Option<&SortValue>) -> String {
        value.map(SortValue::to_cursor).unwrap_or_default()
    }

    /// Parses cursor text for this field.
    fn deserialize(self, cursor: &str) -> Option<SortValue> {
        SortValue::parse(self.kind(), cursor)
    }

    /// Looks up a field by its canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidSortField`] for names outside the
    /// vocabulary; this is a contract error, not a recoverable request state.
    ///
    /// [`ErrorKind::InvalidSortField`]: crate::ErrorKind::InvalidSortField
    fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| Error::invalid_sort_field(Self::RESOURCE, name))
    }
}
