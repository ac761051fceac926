//! In-memory page source.

use std::sync::Arc;

use async_trait::async_trait;
use derive_more::Deref;

use super::MemoryStore;
use crate::pagination::{CursorPage, PageRequest, assemble};
use crate::sort::sort_records;
use crate::{PageSource, Record, RecordFilter, Result};

/// Pages over a [`MemoryStore`] by scanning a snapshot.
///
/// This is the reference behavior the other adapters are checked against.
#[derive(Debug, Clone, Deref)]
pub struct MemoryPageSource<R: Record> {
    #[deref]
    store: Arc<MemoryStore<R>>,
}

impl<R: Record> MemoryPageSource<R> {
    pub fn new(store: Arc<MemoryStore<R>>) -> Self {
        Self { store }
    }

    /// Returns the shared backing store.
    pub fn store(&self) -> &Arc<MemoryStore<R>> {
        &self.store
    }

    /// Serves a page without awaiting.
    pub fn page(&self, request: &PageRequest<R>) -> CursorPage<R> {
        let mut records: Vec<R> = self
            .store
            .find_all()
            .into_iter()
            .filter(|record| request.filter.matches(record))
            .collect();

        sort_records(&mut records, request.sort_by, request.direction);
        let total_count = records.len() as u64;
        assemble(records, request, total_count)
    }
}

impl<R: Record> Default for MemoryPageSource<R> {
    fn default() -> Self {
        Self::new(Arc::default())
    }
}

impl<R: Record> FromIterator<R> for MemoryPageSource<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(Arc::new(iter.into_iter().collect()))
    }
}

#[async_trait]
impl<R: Record> PageSource<R> for MemoryPageSource<R> {
    async fn find_page(&self, request: &PageRequest<R>) -> Result<CursorPage<R>> {
        Ok(self.page(request))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use uuid::Uuid;

    use super::*;
    use crate::resource::{
        Notification, NotificationFilter, NotificationLevel, NotificationSortField,
    };
    use crate::sort::SortDirection;

    fn notification(n: u128, receiver_id: Uuid, second: i64) -> Notification {
        Notification {
            id: Uuid::from_u128(n),
            receiver_id,
            title: format!("notification {n}"),
            content: None,
            level: NotificationLevel::Info,
            created_at: Timestamp::from_second(1_700_000_000 + second).unwrap(),
        }
    }

    #[tokio::test]
    async fn pages_through_five_records_two_at_a_time() {
        let receiver = Uuid::new_v4();
        // Ids are deliberately out of creation order.
        let source: MemoryPageSource<_> = [(50, 1), (40, 2), (30, 3), (20, 4), (10, 5)]
            .into_iter()
            .map(|(n, second)| notification(n, receiver, second))
            .collect();
        let (a, b, c, d, e) = (
            Uuid::from_u128(50),
            Uuid::from_u128(40),
            Uuid::from_u128(30),
            Uuid::from_u128(20),
            Uuid::from_u128(10),
        );

        let request = PageRequest::new(NotificationFilter::for_receiver(receiver))
            .with_sort(NotificationSortField::CreatedAt, SortDirection::Ascending)
            .with_limit(2);

        let first = source.find_page(&request).await.unwrap();
        assert_eq!(first.data.iter().map(|n| n.id).collect::<Vec<_>>(), [a, b]);
        assert!(first.has_next);
        assert_eq!(first.next_id_after, Some(b));
        assert_eq!(first.next_cursor.as_deref(), Some("2023-11-14T22:13:22Z"));
        assert_eq!(first.total_count, 5);

        let request = request.with_cursor(first.next_cursor, first.next_id_after);
        let second = source.find_page(&request).await.unwrap();
        assert_eq!(second.data.iter().map(|n| n.id).collect::<Vec<_>>(), [c, d]);
        assert!(second.has_next);

        let request = request.with_cursor(second.next_cursor, second.next_id_after);
        let third = source.find_page(&request).await.unwrap();
        assert_eq!(third.data.iter().map(|n| n.id).collect::<Vec<_>>(), [e]);
        assert!(!third.has_next);
        assert!(third.next_cursor.is_none());
        assert!(third.next_id_after.is_none());
        assert_eq!(third.total_count, 5);
    }

    #[tokio::test]
    async fn total_counts_filtered_records_only() {
        let receiver = Uuid::new_v4();
        let source: MemoryPageSource<_> = (1..=6)
            .map(|n| {
                let owner = if n % 2 == 0 { receiver } else { Uuid::new_v4() };
                notification(n, owner, n as i64)
            })
            .collect();

        let request = PageRequest::new(NotificationFilter::for_receiver(receiver)).with_limit(1);
        let page = source.find_page(&request).await.unwrap();

        assert_eq!(page.total_count, 3);
        assert_eq!(page.data[0].id, Uuid::from_u128(6));
        assert_eq!(page.sort_by, "createdAt");
        assert_eq!(page.sort_direction, SortDirection::Descending);
    }

    #[tokio::test]
    async fn empty_store_echoes_defaults() {
        let source = MemoryPageSource::<Notification>::default();
        let page = source
            .find_page(&PageRequest::new(NotificationFilter::default()))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.total_count, 0);
        assert_eq!(page.sort_by, "createdAt");
    }
}
