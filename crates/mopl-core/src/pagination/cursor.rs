//! Cursor codec.
//!
//! A cursor is the pair (serialized sort value, tie-break id) taken from the
//! last record of the previous page. Its text part is a plain rendering of a
//! typed value, but callers must treat both parts as opaque pass-through data.

use uuid::Uuid;

use crate::Record;
use crate::sort::{SortDirection, SortField, SortValue, compare_keys};

/// A cursor as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    value: String,
    id_after: Uuid,
}

impl Cursor {
    /// Creates a cursor from its two parts.
    pub fn new(value: impl Into<String>, id_after: Uuid) -> Self {
        Self {
            value: value.into(),
            id_after,
        }
    }

    /// Builds a cursor only when both parts are present.
    ///
    /// A blank value counts as absent. Either part alone means "first page".
    pub fn from_parts(value: Option<&str>, id_after: Option<Uuid>) -> Option<Self> {
        let value = value.filter(|value| !value.trim().is_empty())?;
        Some(Self::new(value, id_after?))
    }

    /// Builds the cursor that points just past `record`.
    pub fn after<R: Record>(field: R::Field, record: &R) -> Self {
        let value = field.extract(record);
        Self::new(field.serialize(value.as_ref()), record.id())
    }

    /// Returns the serialized sort value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the tie-break identifier.
    #[inline]
    pub fn id_after(&self) -> Uuid {
        self.id_after
    }

    /// Decodes the value part for `field`.
    ///
    /// Returns `None` when the text does not parse for the field's type; the
    /// request then falls back to the first page.
    pub fn decode<R: Record>(&self, field: R::Field) -> Option<DecodedCursor> {
        let value = field.deserialize(&self.value);
        if value.is_none() {
            tracing::debug!(
                target: crate::TRACING_TARGET_PAGINATION,
                field = field.name(),
                cursor = %self.value,
                "Ignoring malformed cursor"
            );
        }

        Some(DecodedCursor {
            value: value?,
            id_after: self.id_after,
        })
    }
}

/// A cursor whose value has been parsed for a specific field.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedCursor {
    /// Sort value of the last record of the previous page.
    pub value: SortValue,
    /// Identifier of the last record of the previous page.
    pub id_after: Uuid,
}

impl DecodedCursor {
    /// Returns whether a record with this key lies strictly after the cursor.
    ///
    /// Records without a sort value sort last ascending (first descending),
    /// so they are admitted only when the ordering puts them after the cursor.
    pub fn admits(&self, value: Option<&SortValue>, id: Uuid, direction: SortDirection) -> bool {
        compare_keys(
            (value, id),
            (Some(&self.value), self.id_after),
            direction,
        )
        .is_gt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_parts_required() {
        let id = Uuid::new_v4();
        assert!(Cursor::from_parts(Some("2024-01-01T00:00:00Z"), Some(id)).is_some());
        assert!(Cursor::from_parts(Some("2024-01-01T00:00:00Z"), None).is_none());
        assert!(Cursor::from_parts(None, Some(id)).is_none());
        assert!(Cursor::from_parts(Some("   "), Some(id)).is_none());
        assert!(Cursor::from_parts(None, None).is_none());
    }

    #[test]
    fn admits_strictly_after_in_direction() {
        let cursor = DecodedCursor {
            value: SortValue::Real(5.0),
            id_after: Uuid::from_u128(5),
        };

        let six = SortValue::Real(6.0);
        let five = SortValue::Real(5.0);

        assert!(cursor.admits(Some(&six), Uuid::from_u128(1), SortDirection::Ascending));
        assert!(cursor.admits(Some(&five), Uuid::from_u128(6), SortDirection::Ascending));
        assert!(!cursor.admits(Some(&five), Uuid::from_u128(5), SortDirection::Ascending));
        assert!(!cursor.admits(Some(&five), Uuid::from_u128(4), SortDirection::Ascending));

        assert!(!cursor.admits(Some(&six), Uuid::from_u128(1), SortDirection::Descending));
        assert!(cursor.admits(Some(&five), Uuid::from_u128(4), SortDirection::Descending));
    }

    #[test]
    fn null_values_follow_nulls_last_order() {
        let cursor = DecodedCursor {
            value: SortValue::Real(5.0),
            id_after: Uuid::from_u128(5),
        };
        assert!(cursor.admits(None, Uuid::from_u128(1), SortDirection::Ascending));
        assert!(!cursor.admits(None, Uuid::from_u128(9), SortDirection::Descending));
    }
}
