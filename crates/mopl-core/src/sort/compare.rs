//! The single ordering every adapter agrees on.

use std::cmp::Ordering;

use uuid::Uuid;

use super::{SortDirection, SortField, SortValue};
use crate::Record;

/// Compares two optional values ascending with nulls last.
pub fn compare_nullable(a: Option<&SortValue>, b: Option<&SortValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compares `(value, id)` pairs in the requested direction.
///
/// Ascending puts nulls last and breaks ties by id ascending; descending is
/// the exact reverse of both.
pub fn compare_keys(
    a: (Option<&SortValue>, Uuid),
    b: (Option<&SortValue>, Uuid),
    direction: SortDirection,
) -> Ordering {
    let ordering = compare_nullable(a.0, b.0).then_with(|| a.1.cmp(&b.1));
    direction.apply(ordering)
}

/// Compares two records by `field`, then id, in the requested direction.
pub fn compare_records<R: Record>(
    field: R::Field,
    direction: SortDirection,
    a: &R,
    b: &R,
) -> Ordering {
    let a_value = field.extract(a);
    let b_value = field.extract(b);
    compare_keys(
        (a_value.as_ref(), a.id()),
        (b_value.as_ref(), b.id()),
        direction,
    )
}

/// Sorts records in place by `field`, then id, in the requested direction.
pub fn sort_records<R: Record>(records: &mut [R], field: R::Field, direction: SortDirection) {
    records.sort_by_cached_key(|record| SortKey {
        value: field.extract(record),
        id: record.id(),
        direction,
    });
}

/// Cached key for [`sort_records`], so each value is extracted once.
struct SortKey {
    value: Option<SortValue>,
    id: Uuid,
    direction: SortDirection,
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(
            (self.value.as_ref(), self.id),
            (other.value.as_ref(), other.id),
            self.direction,
        )
    }
}
