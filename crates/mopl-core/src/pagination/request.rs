//! Page requests.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cursor, DecodedCursor};
use crate::sort::{SortDirection, SortField};
use crate::{Record, Result};

/// Maximum number of items per page.
pub const MAX_LIMIT: u32 = 1000;

/// Boundary form of a page request, before the sort field is resolved.
///
/// Every field is optional; unset fields take the resource defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Serialized sort value of the last item of the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Identifier of the last item of the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_after: Option<String>,
    /// Maximum number of items to return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<SortDirection>,
    /// Canonical sort field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

/// A resolved page request for record type `R`.
#[derive(Debug, Clone)]
pub struct PageRequest<R: Record> {
    /// Resource-specific predicate bag.
    pub filter: R::Filter,
    /// Serialized sort value of the last item of the previous page.
    pub cursor: Option<String>,
    /// Identifier of the last item of the previous page.
    pub id_after: Option<Uuid>,
    /// Maximum number of items to return.
    pub limit: u32,
    /// Sort direction.
    pub direction: SortDirection,
    /// Active sort field.
    pub sort_by: R::Field,
}

impl<R: Record> PageRequest<R> {
    /// Creates a first-page request with the resource defaults.
    pub fn new(filter: R::Filter) -> Self {
        let defaults = R::DEFAULTS;
        Self {
            filter,
            cursor: None,
            id_after: None,
            limit: defaults.limit,
            direction: defaults.direction,
            sort_by: defaults.sort_by,
        }
    }

    /// Resolves a boundary query against the resource vocabulary.
    ///
    /// An identifier that is not a UUID is treated like a missing one, so the
    /// request falls back to the first page.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidSortField`] when `sortBy` names a field the
    /// resource does not have.
    ///
    /// [`ErrorKind::InvalidSortField`]: crate::ErrorKind::InvalidSortField
    pub fn from_query(filter: R::Filter, query: PageQuery) -> Result<Self> {
        let mut request = Self::new(filter);

        if let Some(sort_by) = query.sort_by.as_deref() {
            request.sort_by = <R::Field as SortField<R>>::from_name(sort_by)?;
        }
        if let Some(direction) = query.sort_direction {
            request.direction = direction;
        }
        if let Some(limit) = query.limit {
            request = request.with_limit(limit);
        }

        request.cursor = query.cursor;
        request.id_after = query
            .id_after
            .as_deref()
            .and_then(|id| Uuid::parse_str(id.trim()).ok());

        Ok(request)
    }

    /// Sets the page size, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, MAX_LIMIT);
        self
    }

    /// Sets the sort field and direction.
    pub fn with_sort(mut self, sort_by: R::Field, direction: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.direction = direction;
        self
    }

    /// Continues after the given cursor parts.
    pub fn with_cursor(mut self, cursor: Option<String>, id_after: Option<Uuid>) -> Self {
        self.cursor = cursor;
        self.id_after = id_after;
        self
    }

    /// Returns the number of rows to fetch to detect a further page.
    #[inline]
    pub fn fetch_limit(&self) -> u32 {
        self.limit.saturating_add(1)
    }

    /// Returns the cursor when both of its parts are present.
    pub fn cursor(&self) -> Option<Cursor> {
        Cursor::from_parts(self.cursor.as_deref(), self.id_after)
    }

    /// Returns the cursor decoded for the active sort field.
    pub fn decoded_cursor(&self) -> Option<DecodedCursor> {
        self.cursor()?.decode::<R>(self.sort_by)
    }

    /// Returns whether this request continues from a usable cursor.
    #[inline]
    pub fn has_cursor(&self) -> bool {
        self.decoded_cursor().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::resource::{Review, ReviewFilter, ReviewSortField};

    #[test]
    fn empty_query_takes_resource_defaults() {
        let request =
            PageRequest::<Review>::from_query(ReviewFilter::default(), PageQuery::default()).unwrap();

        assert_eq!(request.limit, 20);
        assert_eq!(request.sort_by, ReviewSortField::CreatedAt);
        assert_eq!(request.direction, SortDirection::Descending);
        assert!(!request.has_cursor());
    }

    #[test]
    fn limit_is_clamped() {
        let query = |limit| PageQuery {
            limit: Some(limit),
            ..PageQuery::default()
        };

        let zero = PageRequest::<Review>::from_query(ReviewFilter::default(), query(0)).unwrap();
        let huge = PageRequest::<Review>::from_query(ReviewFilter::default(), query(50_000)).unwrap();
        assert_eq!(zero.limit, 1);
        assert_eq!(huge.limit, MAX_LIMIT);
        assert_eq!(huge.fetch_limit(), MAX_LIMIT + 1);
    }

    #[test]
    fn unknown_sort_field_is_a_contract_error() {
        let query = PageQuery {
            sort_by: Some("title".into()),
            ..PageQuery::default()
        };

        let error = PageRequest::<Review>::from_query(ReviewFilter::default(), query).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidSortField);
    }

    #[test]
    fn malformed_id_after_means_first_page() {
        let query = PageQuery {
            cursor: Some("4.5".into()),
            id_after: Some("not-a-uuid".into()),
            sort_by: Some("rating".into()),
            ..PageQuery::default()
        };

        let request = PageRequest::<Review>::from_query(ReviewFilter::default(), query).unwrap();
        assert_eq!(request.sort_by, ReviewSortField::Rating);
        assert!(request.id_after.is_none());
        assert!(!request.has_cursor());
    }

    #[test]
    fn query_deserializes_from_camel_case() {
        let query: PageQuery = serde_json::from_str(
            r#"{"cursor":"4.5","idAfter":"00000000-0000-0000-0000-000000000003","limit":2,"sortDirection":"ASCENDING","sortBy":"rating"}"#,
        )
        .unwrap();

        let request = PageRequest::<Review>::from_query(ReviewFilter::default(), query).unwrap();
        assert_eq!(request.limit, 2);
        assert_eq!(request.direction, SortDirection::Ascending);
        assert_eq!(request.id_after, Some(Uuid::from_u128(3)));
        assert!(request.has_cursor());
    }
}
