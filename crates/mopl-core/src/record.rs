//! Traits tying a record type to its sort vocabulary and filters.

use std::fmt;

use uuid::Uuid;

use crate::sort::{SortDirection, SortField};

/// A listable record.
///
/// Every record carries exactly one identifier, which doubles as the
/// tie-break key of the keyset ordering.
pub trait Record: fmt::Debug + Clone + Send + Sync + 'static {
    /// Sort vocabulary of this record type.
    type Field: SortField<Self>;

    /// Filter bag accepted when listing this record type.
    type Filter: RecordFilter<Self>;

    /// Defaults applied when a request leaves limit or sort unset.
    const DEFAULTS: PageDefaults<Self::Field>;

    /// Returns the tie-break identifier.
    fn id(&self) -> Uuid;
}

/// A predicate over records, evaluated in process.
///
/// Relational and search adapters translate the same filter into native
/// clauses; the in-memory and sorted-set adapters call [`matches`] directly.
///
/// [`matches`]: RecordFilter::matches
pub trait RecordFilter<R>: fmt::Debug + Clone + Send + Sync + 'static {
    /// Returns whether the record passes every active condition.
    fn matches(&self, record: &R) -> bool;
}

/// Per-resource defaults for the page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDefaults<F> {
    /// Page size when none is requested.
    pub limit: u32,
    /// Sort field when none is requested.
    pub sort_by: F,
    /// Sort direction when none is requested.
    pub direction: SortDirection,
}

impl<F> PageDefaults<F> {
    /// Creates a new set of defaults.
    pub const fn new(limit: u32, sort_by: F, direction: SortDirection) -> Self {
        Self {
            limit,
            sort_by,
            direction,
        }
    }
}

/// Returns whether `haystack` contains `needle`, ignoring case.
///
/// An empty or blank needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Normalizes an optional keyword: trims it and drops it when blank.
pub fn normalize_keyword(keyword: Option<&str>) -> Option<&str> {
    keyword.map(str::trim).filter(|keyword| !keyword.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_ignore_case_trims_needle() {
        assert!(contains_ignore_case("Alice Kim", "  kim "));
        assert!(contains_ignore_case("Alice", ""));
        assert!(!contains_ignore_case("Alice", "bob"));
    }

    #[test]
    fn normalize_keyword_drops_blank() {
        assert_eq!(normalize_keyword(Some("  ")), None);
        assert_eq!(normalize_keyword(Some(" tv ")), Some("tv"));
        assert_eq!(normalize_keyword(None), None);
    }
}
