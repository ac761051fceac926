//! Watching-session reads and writes over a [`SortedSetBackend`].

use std::collections::HashMap;

use jiff::Timestamp;
use mopl_core::RecordFilter;
use mopl_core::pagination::PageRequest;
use mopl_core::resource::{WatchingSession, WatchingSessionFilter};
use uuid::Uuid;

use super::OverfetchPolicy;
use crate::{RedisResult, ScoredMember, SortedSetBackend, TRACING_TARGET_STORE, WatchingSessionKeys};

/// Truncates to the millisecond precision of sorted-set scores, so score
/// order and timestamp order agree.
fn to_score_precision(timestamp: Timestamp) -> Timestamp {
    Timestamp::from_millisecond(timestamp.as_millisecond()).unwrap_or(timestamp)
}

fn score_of(timestamp: Timestamp) -> f64 {
    timestamp.as_millisecond() as f64
}

/// Stores watching sessions and reads candidate windows for paging.
///
/// A session lives under three keys: its JSON body, its watcher's pointer,
/// and a member of its content's sorted set. A watcher has at most one
/// session at a time.
#[derive(Debug, Clone)]
pub struct WatchingSessionRepository<B> {
    backend: B,
    overfetch: OverfetchPolicy,
}

impl<B: SortedSetBackend> WatchingSessionRepository<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            overfetch: OverfetchPolicy::default(),
        }
    }

    pub fn with_overfetch(mut self, overfetch: OverfetchPolicy) -> Self {
        self.overfetch = overfetch;
        self
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn overfetch(&self) -> OverfetchPolicy {
        self.overfetch
    }

    /// Stores a session and indexes it under its content.
    ///
    /// Fills in `created_at` when absent. A previous session of the same
    /// watcher is removed first.
    pub async fn save(&self, mut session: WatchingSession) -> RedisResult<WatchingSession> {
        let created_at = to_score_precision(session.created_at.unwrap_or_else(Timestamp::now));
        session.created_at = Some(created_at);

        let watcher_key = WatchingSessionKeys::watcher(session.watcher.user_id);
        if let Some(previous) = self.backend.get(&watcher_key).await?
            && previous != session.id.to_string()
            && let Ok(previous_id) = Uuid::parse_str(&previous)
        {
            tracing::debug!(
                target: TRACING_TARGET_STORE,
                watcher_id = %session.watcher.user_id,
                previous_session_id = %previous_id,
                "Replacing previous watching session"
            );
            self.delete(previous_id).await?;
        }

        let body = serde_json::to_string(&session)?;
        self.backend
            .set(&WatchingSessionKeys::session(session.id), &body)
            .await?;
        self.backend
            .set(&watcher_key, &session.id.to_string())
            .await?;
        self.backend
            .zadd(
                &WatchingSessionKeys::content(session.content.id),
                &session.id.to_string(),
                score_of(created_at),
            )
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            session_id = %session.id,
            content_id = %session.content.id,
            "Saved watching session"
        );
        Ok(session)
    }

    /// Removes a session from all of its keys.
    ///
    /// Returns false when no body was stored under `session_id`.
    pub async fn delete(&self, session_id: Uuid) -> RedisResult<bool> {
        let session_key = WatchingSessionKeys::session(session_id);
        let Some(body) = self.backend.get(&session_key).await? else {
            return Ok(false);
        };

        self.backend.del(&session_key).await?;

        let session: WatchingSession = match serde_json::from_str(&body) {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_STORE,
                    session_id = %session_id,
                    error = %error,
                    "Deleted unparseable session body; index entries left behind"
                );
                return Ok(true);
            }
        };

        let watcher_key = WatchingSessionKeys::watcher(session.watcher.user_id);
        let member = session_id.to_string();
        if self.backend.get(&watcher_key).await?.as_deref() == Some(member.as_str()) {
            self.backend.del(&watcher_key).await?;
        }

        self.backend
            .zrem(&WatchingSessionKeys::content(session.content.id), &member)
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            session_id = %session_id,
            content_id = %session.content.id,
            "Deleted watching session"
        );
        Ok(true)
    }

    /// Loads a session body.
    pub async fn find_by_id(&self, session_id: Uuid) -> RedisResult<Option<WatchingSession>> {
        let Some(body) = self
            .backend
            .get(&WatchingSessionKeys::session(session_id))
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Loads the current session of a watcher.
    pub async fn find_by_watcher_id(&self, watcher_id: Uuid) -> RedisResult<Option<WatchingSession>> {
        let pointer = self
            .backend
            .get(&WatchingSessionKeys::watcher(watcher_id))
            .await?;

        let Some(session_id) = pointer.as_deref().and_then(|id| Uuid::parse_str(id).ok()) else {
            return Ok(None);
        };

        let session = self.find_by_id(session_id).await?;
        if session.is_none() {
            tracing::debug!(
                target: TRACING_TARGET_STORE,
                watcher_id = %watcher_id,
                session_id = %session_id,
                "Watcher points at a missing session"
            );
        }
        Ok(session)
    }

    /// Counts the members indexed under one content item.
    pub async fn count_by_content_id(&self, content_id: Uuid) -> RedisResult<u64> {
        self.backend
            .zcard(&WatchingSessionKeys::content(content_id))
            .await
    }

    /// Counts members for several content items in one round trip.
    pub async fn count_by_content_ids(&self, content_ids: &[Uuid]) -> RedisResult<HashMap<Uuid, u64>> {
        let keys: Vec<String> = content_ids
            .iter()
            .map(|id| WatchingSessionKeys::content(*id))
            .collect();
        let counts = self.backend.zcard_many(&keys).await?;

        Ok(content_ids.iter().copied().zip(counts).collect())
    }

    /// Reads the candidate window for a page request.
    ///
    /// The result is hydrated and filtered but not yet sorted; the caller
    /// resolves ordering and the cursor tie-break. With a cursor the window
    /// starts at the cursor score and is widened by every member sharing
    /// that score, since those at or before `id_after` are skipped later.
    pub async fn find_window(
        &self,
        request: &PageRequest<WatchingSession>,
    ) -> RedisResult<Vec<WatchingSession>> {
        let key = WatchingSessionKeys::content(request.filter.content_id);
        let fetch_size = self.overfetch.fetch_size(request.limit);
        let reverse = request.direction.is_descending();

        let members = match request.decoded_cursor().and_then(|cursor| cursor.value.score()) {
            Some(score) => {
                let same_score = self.backend.zcount(&key, score, score).await?;
                let count = fetch_size.saturating_add(usize::try_from(same_score).unwrap_or(usize::MAX));
                self.backend
                    .range_by_score(&key, score, reverse, count)
                    .await?
            }
            None => {
                let stop = isize::try_from(fetch_size).unwrap_or(isize::MAX) - 1;
                self.backend.range_by_rank(&key, 0, stop, reverse).await?
            }
        };

        let window = members.len();
        let sessions = self.hydrate_matching(&members, &request.filter).await?;

        tracing::debug!(
            target: TRACING_TARGET_STORE,
            content_id = %request.filter.content_id,
            fetch_size,
            window,
            hydrated = sessions.len(),
            "Read watching-session window"
        );
        Ok(sessions)
    }

    /// Counts the sessions matching `filter`, ignoring any cursor.
    pub async fn count_matching(&self, filter: &WatchingSessionFilter) -> RedisResult<u64> {
        let key = WatchingSessionKeys::content(filter.content_id);
        if filter.watcher_name().is_none() {
            return self.backend.zcard(&key).await;
        }

        let members = self.backend.range_by_rank(&key, 0, -1, false).await?;
        let sessions = self.hydrate_matching(&members, filter).await?;
        Ok(sessions.len() as u64)
    }

    async fn hydrate_matching(
        &self,
        members: &[ScoredMember],
        filter: &WatchingSessionFilter,
    ) -> RedisResult<Vec<WatchingSession>> {
        let mut sessions = self.hydrate(members).await?;
        sessions.retain(|session| filter.matches(session));
        Ok(sessions)
    }

    /// Loads the bodies behind `members` in one round trip, keeping member
    /// order and skipping anything unusable.
    pub(crate) async fn hydrate(&self, members: &[ScoredMember]) -> RedisResult<Vec<WatchingSession>> {
        let usable: Vec<(Uuid, f64)> = members.iter().filter_map(usable_member).collect();
        let keys: Vec<String> = usable
            .iter()
            .map(|(session_id, _)| WatchingSessionKeys::session(*session_id))
            .collect();
        let bodies = self.backend.get_many(&keys).await?;

        Ok(usable
            .into_iter()
            .zip(bodies)
            .filter_map(|((session_id, score), body)| decode_body(session_id, score, body))
            .collect())
    }
}

fn usable_member(member: &ScoredMember) -> Option<(Uuid, f64)> {
    let Ok(session_id) = Uuid::parse_str(&member.member) else {
        tracing::warn!(
            target: TRACING_TARGET_STORE,
            member = %member.member,
            "Skipping member that is not a session id"
        );
        return None;
    };

    let Some(score) = member.parsed_score() else {
        tracing::warn!(
            target: TRACING_TARGET_STORE,
            session_id = %session_id,
            score = %member.score,
            "Skipping member with non-numeric score"
        );
        return None;
    };

    Some((session_id, score))
}

fn decode_body(session_id: Uuid, score: f64, body: Option<String>) -> Option<WatchingSession> {
    let Some(body) = body else {
        tracing::debug!(
            target: TRACING_TARGET_STORE,
            session_id = %session_id,
            "Skipping member whose body expired"
        );
        return None;
    };

    let mut session: WatchingSession = match serde_json::from_str(&body) {
        Ok(session) => session,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET_STORE,
                session_id = %session_id,
                error = %error,
                "Skipping unparseable session body"
            );
            return None;
        }
    };

    if session.created_at.is_none() {
        session.created_at = Timestamp::from_millisecond(score as i64).ok();
    }
    Some(session)
}
