//! Back-end agnostic page assembly.

use super::{Cursor, CursorPage, PageRequest};
use crate::Record;
use crate::sort::SortField;

/// Builds a page from records already sorted for `request`.
///
/// Drops everything at or before the request cursor, keeps `limit + 1`
/// records to detect a further page, and derives the next cursor from the
/// last kept record. `total_count` must count every filtered record,
/// ignoring the cursor.
pub fn assemble<R, I>(sorted: I, request: &PageRequest<R>, total_count: u64) -> CursorPage<R>
where
    R: Record,
    I: IntoIterator<Item = R>,
{
    let fetch_limit = request.fetch_limit() as usize;
    let rows: Vec<R> = match request.decoded_cursor() {
        Some(cursor) => sorted
            .into_iter()
            .filter(|record| {
                let value = request.sort_by.extract(record);
                cursor.admits(value.as_ref(), record.id(), request.direction)
            })
            .take(fetch_limit)
            .collect(),
        None => sorted.into_iter().take(fetch_limit).collect(),
    };

    finish(rows, request, total_count)
}

/// Builds a page from rows a back-end already filtered past the cursor.
///
/// `rows` holds at most `limit + 1` records in request order.
pub fn finish<R: Record>(rows: Vec<R>, request: &PageRequest<R>, total_count: u64) -> CursorPage<R> {
    let sort_by = request.sort_by;
    let page = CursorPage::new(
        rows,
        request.limit,
        total_count,
        sort_by.name(),
        request.direction,
        |last| {
            let cursor = Cursor::after(sort_by, last);
            (cursor.value().to_owned(), cursor.id_after())
        },
    );

    tracing::debug!(
        target: crate::TRACING_TARGET_PAGINATION,
        sort_by = sort_by.name(),
        direction = %request.direction,
        limit = request.limit,
        returned = page.data.len(),
        has_next = page.has_next,
        total_count,
        "Assembled page"
    );

    page
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::resource::{Review, ReviewFilter, ReviewSortField, UserSummary};
    use crate::sort::{SortDirection, sort_records};

    fn review(n: u128, rating: f64, minute: i64) -> Review {
        Review {
            id: Uuid::from_u128(n),
            content_id: Uuid::from_u128(1000),
            author: UserSummary::new(Uuid::from_u128(2000), "author"),
            text: format!("review {n}"),
            rating,
            created_at: Timestamp::from_second(1_700_000_000 + minute * 60).unwrap(),
        }
    }

    fn fixture() -> Vec<Review> {
        vec![
            review(1, 4.0, 0),
            review(2, 3.5, 1),
            review(3, 4.0, 2),
            review(4, 2.0, 3),
            review(5, 5.0, 4),
            review(6, 3.5, 5),
            review(7, 2.0, 6),
        ]
    }

    fn request(
        field: ReviewSortField,
        direction: SortDirection,
        limit: u32,
    ) -> PageRequest<Review> {
        PageRequest::new(ReviewFilter::default())
            .with_sort(field, direction)
            .with_limit(limit)
    }

    fn sorted(field: ReviewSortField, direction: SortDirection) -> Vec<Review> {
        let mut records = fixture();
        sort_records(&mut records, field, direction);
        records
    }

    fn collect_all(field: ReviewSortField, direction: SortDirection, limit: u32) -> Vec<Uuid> {
        let records = sorted(field, direction);
        let total = records.len() as u64;
        let mut request = request(field, direction, limit);
        let mut ids = Vec::new();

        loop {
            let page = assemble(records.clone(), &request, total);
            assert!(page.data.len() <= limit as usize);
            ids.extend(page.data.iter().map(|r| r.id));
            if !page.has_next {
                assert!(page.next_cursor.is_none());
                assert!(page.next_id_after.is_none());
                break;
            }
            request = request.with_cursor(page.next_cursor, page.next_id_after);
        }

        ids
    }

    #[test]
    fn concatenated_pages_reproduce_full_order() {
        for field in [ReviewSortField::CreatedAt, ReviewSortField::Rating] {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let expected: Vec<Uuid> = sorted(field, direction).iter().map(|r| r.id).collect();
                for limit in 1..=8 {
                    assert_eq!(
                        collect_all(field, direction, limit),
                        expected,
                        "{field:?} {direction} limit {limit}"
                    );
                }
            }
        }
    }

    #[test]
    fn rating_ties_break_by_id() {
        let ids: Vec<u128> = sorted(ReviewSortField::Rating, SortDirection::Ascending)
            .iter()
            .map(|r| r.id.as_u128())
            .collect();
        assert_eq!(ids, vec![4, 7, 2, 6, 1, 3, 5]);
    }

    #[test]
    fn limit_equal_to_total_has_no_next() {
        let records = sorted(ReviewSortField::CreatedAt, SortDirection::Ascending);
        let request = request(ReviewSortField::CreatedAt, SortDirection::Ascending, 7);

        let page = assemble(records, &request, 7);
        assert_eq!(page.data.len(), 7);
        assert!(!page.has_next);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_past_end_yields_empty_page() {
        let records = sorted(ReviewSortField::CreatedAt, SortDirection::Ascending);
        let request = request(ReviewSortField::CreatedAt, SortDirection::Ascending, 3)
            .with_cursor(Some("2100-01-01T00:00:00Z".into()), Some(Uuid::max()));

        let page = assemble(records, &request, 7);
        assert!(page.data.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.total_count, 7);
        assert_eq!(page.sort_by, "createdAt");
        assert_eq!(page.sort_direction, SortDirection::Ascending);
    }

    #[test]
    fn malformed_cursor_falls_back_to_first_page() {
        let records = sorted(ReviewSortField::Rating, SortDirection::Descending);
        let first = assemble(
            records.clone(),
            &request(ReviewSortField::Rating, SortDirection::Descending, 2),
            7,
        );
        let malformed = assemble(
            records,
            &request(ReviewSortField::Rating, SortDirection::Descending, 2)
                .with_cursor(Some("not-a-number".into()), Some(Uuid::from_u128(3))),
            7,
        );
        assert_eq!(first, malformed);
    }

    #[test]
    fn cursor_without_id_is_first_page() {
        let records = sorted(ReviewSortField::CreatedAt, SortDirection::Ascending);
        let request = request(ReviewSortField::CreatedAt, SortDirection::Ascending, 2)
            .with_cursor(Some("2023-11-14T22:15:20Z".into()), None);

        let page = assemble(records, &request, 7);
        assert_eq!(page.data[0].id, Uuid::from_u128(1));
    }

    #[test]
    fn repeated_request_is_identical() {
        let records = sorted(ReviewSortField::Rating, SortDirection::Ascending);
        let request = request(ReviewSortField::Rating, SortDirection::Ascending, 3)
            .with_cursor(Some("3.5".into()), Some(Uuid::from_u128(6)));

        let first = assemble(records.clone(), &request, 7);
        let second = assemble(records, &request, 7);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn next_cursor_serializes_sort_value() {
        let records = sorted(ReviewSortField::Rating, SortDirection::Descending);
        let page = assemble(
            records,
            &request(ReviewSortField::Rating, SortDirection::Descending, 2),
            7,
        );
        let ids: Vec<u128> = page.data.iter().map(|r| r.id.as_u128()).collect();
        assert_eq!(ids, vec![5, 3]);
        assert_eq!(page.next_cursor.as_deref(), Some("4"));
        assert_eq!(page.next_id_after, Some(Uuid::from_u128(3)));
    }
}
