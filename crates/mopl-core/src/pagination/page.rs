//! Page responses.

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::sort::SortDirection;

/// Result of a cursor-paginated listing.
///
/// When `has_next` is false both next-cursor parts are `None`, and `data`
/// never holds more than the requested limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    /// The items in this page.
    pub data: Vec<T>,
    /// Serialized sort value of the last item, present only when more items exist.
    pub next_cursor: Option<String>,
    /// Identifier of the last item, present only when more items exist.
    pub next_id_after: Option<Uuid>,
    /// Whether another page follows.
    pub has_next: bool,
    /// Number of items matching the filters, ignoring the cursor.
    pub total_count: u64,
    /// Canonical name of the sort field.
    pub sort_by: String,
    /// Sort direction.
    pub sort_direction: SortDirection,
}

impl<T> CursorPage<T> {
    /// Creates a cursor page from up to `limit + 1` rows.
    ///
    /// # Arguments
    ///
    /// * `items` - Rows after the cursor, in order (`limit + 1` if more exist)
    /// * `limit` - The requested page size
    /// * `total_count` - Number of items matching the filters
    /// * `sort_by` - Canonical sort field name
    /// * `sort_direction` - Requested direction
    /// * `cursor_fn` - Extracts the cursor text and id from the last kept item
    pub fn new<F>(
        mut items: Vec<T>,
        limit: u32,
        total_count: u64,
        sort_by: impl Into<String>,
        sort_direction: SortDirection,
        cursor_fn: F,
    ) -> Self
    where
        F: Fn(&T) -> (String, Uuid),
    {
        let limit = limit as usize;
        let has_next = items.len() > limit;

        // Remove the extra items used to detect more pages
        items.truncate(limit);

        let (next_cursor, next_id_after) = match items.last() {
            Some(last) if has_next => {
                let (cursor, id) = cursor_fn(last);
                (Some(cursor), Some(id))
            }
            _ => (None, None),
        };

        Self {
            data: items,
            next_cursor,
            next_id_after,
            has_next: has_next && next_id_after.is_some(),
            total_count,
            sort_by: sort_by.into(),
            sort_direction,
        }
    }

    /// Creates an empty cursor page that still echoes the sort.
    pub fn empty(sort_by: impl Into<String>, sort_direction: SortDirection, total_count: u64) -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            next_id_after: None,
            has_next: false,
            total_count,
            sort_by: sort_by.into(),
            sort_direction,
        }
    }

    /// Returns true if there are more items to fetch.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.has_next
    }

    /// Returns the number of items in this page.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether this page holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            data: self.data.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            next_id_after: self.next_id_after,
            has_next: self.has_next,
            total_count: self.total_count,
            sort_by: self.sort_by,
            sort_direction: self.sort_direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_of(n: &u32) -> (String, Uuid) {
        (n.to_string(), Uuid::from_u128(u128::from(*n)))
    }

    #[test]
    fn cursor_page_with_more() {
        let items: Vec<u32> = (1..=51).collect();
        let page = CursorPage::new(items, 50, 100, "createdAt", SortDirection::Ascending, cursor_of);

        assert_eq!(page.len(), 50);
        assert_eq!(page.total_count, 100);
        assert!(page.has_more());
        assert_eq!(page.next_cursor.as_deref(), Some("50"));
        assert_eq!(page.next_id_after, Some(Uuid::from_u128(50)));
    }

    #[test]
    fn cursor_page_without_more() {
        let items: Vec<u32> = (1..=30).collect();
        let page = CursorPage::new(items, 50, 30, "createdAt", SortDirection::Ascending, cursor_of);

        assert_eq!(page.len(), 30);
        assert!(!page.has_more());
        assert!(page.next_cursor.is_none());
        assert!(page.next_id_after.is_none());
    }

    #[test]
    fn limit_equal_to_rows_has_no_next() {
        let items: Vec<u32> = (1..=5).collect();
        let page = CursorPage::new(items, 5, 5, "name", SortDirection::Descending, cursor_of);

        assert_eq!(page.len(), 5);
        assert!(!page.has_next);
    }

    #[test]
    fn empty_page_echoes_sort() {
        let page = CursorPage::<u32>::empty("rating", SortDirection::Descending, 7);

        assert!(page.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.sort_by, "rating");
        assert_eq!(page.sort_direction, SortDirection::Descending);
    }

    #[test]
    fn serializes_with_camel_case_names() {
        let page = CursorPage::<u32>::empty("createdAt", SortDirection::Ascending, 0);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["hasNext"], false);
        assert_eq!(json["totalCount"], 0);
        assert_eq!(json["sortBy"], "createdAt");
        assert_eq!(json["sortDirection"], "ASCENDING");
        assert!(json["nextCursor"].is_null());
        assert!(json["nextIdAfter"].is_null());
    }

    #[test]
    fn map_keeps_cursor_state() {
        let items: Vec<u32> = (1..=3).collect();
        let page = CursorPage::new(items, 2, 3, "createdAt", SortDirection::Ascending, cursor_of)
            .map(|n| n * 10);

        assert_eq!(page.data, vec![10, 20]);
        assert!(page.has_next);
        assert_eq!(page.next_cursor.as_deref(), Some("2"));
    }
}
