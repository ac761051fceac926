use async_trait::async_trait;
use mopl_core::pagination::{CursorPage, PageRequest, assemble};
use mopl_core::resource::WatchingSession;
use mopl_core::sort::sort_records;
use mopl_core::{PageSource, Result};

use super::WatchingSessionRepository;
use crate::{RedisClient, SortedSetBackend, TRACING_TARGET_STORE};

/// Pages watching sessions out of a content item's sorted set.
///
/// Each page reads a bounded window of members, hydrates their bodies,
/// filters by watcher name and re-sorts before assembly. A selective name
/// filter can leave the window short, which yields a short page.
#[derive(Debug, Clone)]
pub struct WatchingSessionPageSource<B> {
    repository: WatchingSessionRepository<B>,
}

impl<B: SortedSetBackend> WatchingSessionPageSource<B> {
    pub fn new(repository: WatchingSessionRepository<B>) -> Self {
        Self { repository }
    }

    #[inline]
    pub fn repository(&self) -> &WatchingSessionRepository<B> {
        &self.repository
    }
}

impl From<RedisClient> for WatchingSessionPageSource<RedisClient> {
    fn from(client: RedisClient) -> Self {
        let overfetch = client.config().overfetch_policy();
        Self::new(WatchingSessionRepository::new(client).with_overfetch(overfetch))
    }
}

#[async_trait]
impl<B: SortedSetBackend> PageSource<WatchingSession> for WatchingSessionPageSource<B> {
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_STORE,
        fields(content_id = %request.filter.content_id, limit = request.limit)
    )]
    async fn find_page(
        &self,
        request: &PageRequest<WatchingSession>,
    ) -> Result<CursorPage<WatchingSession>> {
        let mut sessions = self.repository.find_window(request).await?;
        sort_records(&mut sessions, request.sort_by, request.direction);

        let total_count = self.repository.count_matching(&request.filter).await?;
        Ok(assemble(sessions, request, total_count))
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use mopl_core::memory::MemoryPageSource;
    use mopl_core::resource::{
        ContentSummary, UserSummary, WatchingSessionFilter, WatchingSessionSortField,
    };
    use mopl_core::sort::SortDirection;
    use uuid::Uuid;

    use super::*;
    use crate::{MemorySortedSet, OverfetchPolicy, WatchingSessionKeys};

    const CONTENT: u128 = 0xC0;

    fn session(n: u128, name: &str, millis: i64) -> WatchingSession {
        WatchingSession {
            id: Uuid::from_u128(n),
            watcher: UserSummary::new(Uuid::from_u128(1000 + n), name),
            content: ContentSummary::new(Uuid::from_u128(CONTENT), "Live"),
            created_at: Some(Timestamp::from_millisecond(1_700_000_000_000 + millis).unwrap()),
        }
    }

    async fn source_with(
        sessions: &[WatchingSession],
        overfetch: OverfetchPolicy,
    ) -> WatchingSessionPageSource<MemorySortedSet> {
        let repository = WatchingSessionRepository::new(MemorySortedSet::new()).with_overfetch(overfetch);
        for session in sessions {
            repository.save(session.clone()).await.unwrap();
        }
        WatchingSessionPageSource::new(repository)
    }

    fn request(direction: SortDirection, limit: u32) -> PageRequest<WatchingSession> {
        PageRequest::new(WatchingSessionFilter::new(Uuid::from_u128(CONTENT)))
            .with_sort(WatchingSessionSortField::CreatedAt, direction)
            .with_limit(limit)
    }

    fn fixture() -> Vec<WatchingSession> {
        vec![
            session(7, "Kim", 30),
            session(2, "Lee", 10),
            session(5, "Park", 10),
            session(1, "Choi", 50),
            session(9, "Kimura", 20),
            session(3, "Jung", 10),
            session(8, "Han", 40),
        ]
    }

    async fn collect_all(
        source: &dyn PageSource<WatchingSession>,
        mut request: PageRequest<WatchingSession>,
    ) -> Vec<Uuid> {
        let mut ids = Vec::new();
        loop {
            let page = source.find_page(&request).await.unwrap();
            ids.extend(page.data.iter().map(|s| s.id));
            if !page.has_next {
                assert!(page.next_cursor.is_none());
                break;
            }
            request = request.with_cursor(page.next_cursor, page.next_id_after);
        }
        ids
    }

    #[tokio::test]
    async fn vanished_body_is_dropped_from_page() {
        let sessions = [session(1, "a", 1), session(2, "b", 2), session(3, "c", 3)];
        let source = source_with(&sessions, OverfetchPolicy::default()).await;

        let page = source.find_page(&request(SortDirection::Ascending, 10)).await.unwrap();
        assert_eq!(page.data.len(), 3);
        assert!(!page.has_next);
        assert_eq!(page.total_count, 3);

        source
            .repository()
            .backend()
            .del(&WatchingSessionKeys::session(Uuid::from_u128(2)))
            .await
            .unwrap();

        let page = source.find_page(&request(SortDirection::Ascending, 10)).await.unwrap();
        let ids: Vec<u128> = page.data.iter().map(|s| s.id.as_u128()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn pages_like_the_memory_store() {
        let sessions = fixture();
        let source = source_with(&sessions, OverfetchPolicy::default()).await;
        let oracle: MemoryPageSource<WatchingSession> = sessions.into_iter().collect();

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            for limit in 1..=8 {
                let expected = collect_all(&oracle, request(direction, limit)).await;
                let actual = collect_all(&source, request(direction, limit)).await;
                assert_eq!(actual, expected, "{direction} limit {limit}");
                assert_eq!(actual.len(), 7);
            }
        }
    }

    #[tokio::test]
    async fn same_score_ties_break_by_id() {
        let source = source_with(&fixture(), OverfetchPolicy::default()).await;
        let page = source.find_page(&request(SortDirection::Ascending, 3)).await.unwrap();

        let ids: Vec<u128> = page.data.iter().map(|s| s.id.as_u128()).collect();
        assert_eq!(ids, vec![2, 3, 5]);
        assert!(page.has_next);
        assert_eq!(page.next_id_after, Some(Uuid::from_u128(5)));

        let next = request(SortDirection::Ascending, 3)
            .with_cursor(page.next_cursor, page.next_id_after);
        let page = source.find_page(&next).await.unwrap();
        let ids: Vec<u128> = page.data.iter().map(|s| s.id.as_u128()).collect();
        assert_eq!(ids, vec![9, 7, 8]);
    }

    #[tokio::test]
    async fn many_sessions_in_one_millisecond_are_all_served() {
        let sessions: Vec<WatchingSession> = (1..=12).map(|n| session(n, "same", 0)).collect();
        let source = source_with(&sessions, OverfetchPolicy::default()).await;
        let oracle: MemoryPageSource<WatchingSession> = sessions.into_iter().collect();

        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            for limit in [1, 2, 5] {
                let expected = collect_all(&oracle, request(direction, limit)).await;
                let actual = collect_all(&source, request(direction, limit)).await;
                assert_eq!(actual.len(), 12, "{direction} limit {limit}");
                assert_eq!(actual, expected, "{direction} limit {limit}");
            }
        }

        let ids: Vec<u128> = collect_all(&source, request(SortDirection::Ascending, 1))
            .await
            .iter()
            .map(|id| id.as_u128())
            .collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn name_filter_narrows_page_and_total() {
        let source = source_with(&fixture(), OverfetchPolicy::default()).await;
        let mut request = request(SortDirection::Descending, 10);
        request.filter = request.filter.with_watcher_name(" KIM ");

        let page = source.find_page(&request).await.unwrap();
        let ids: Vec<u128> = page.data.iter().map(|s| s.id.as_u128()).collect();
        assert_eq!(ids, vec![7, 9]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn selective_filter_can_under_fill_window() {
        let source = source_with(&fixture(), OverfetchPolicy::new(1, 2000)).await;
        let mut request = request(SortDirection::Ascending, 1);
        request.filter = request.filter.with_watcher_name("choi");

        let page = source.find_page(&request).await.unwrap();
        assert!(page.data.is_empty());
        assert!(!page.has_next);
        assert_eq!(page.total_count, 1);
    }

    #[tokio::test]
    async fn unknown_content_is_empty() {
        let source = source_with(&fixture(), OverfetchPolicy::default()).await;
        let request = PageRequest::new(WatchingSessionFilter::new(Uuid::from_u128(1)));

        let page = source.find_page(&request).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.sort_by, "createdAt");
    }
}
