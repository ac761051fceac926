//! Sorted-set storage seam.
//!
//! The watching-session repository only talks to [`SortedSetBackend`], so
//! the same paging code runs against a live Redis server or the in-process
//! [`MemorySortedSet`].

mod memory;
mod redis_backend;

use async_trait::async_trait;

pub use self::memory::MemorySortedSet;
use crate::RedisResult;

/// A sorted-set member with its score as the server rendered it.
///
/// The score stays textual until the caller parses it, so a non-numeric
/// score can be skipped instead of failing the whole range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMember {
    pub member: String,
    pub score: String,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            score: score.into(),
        }
    }

    /// Parses the score, returning `None` for non-numeric text.
    pub fn parsed_score(&self) -> Option<f64> {
        self.score.trim().parse::<f64>().ok().filter(|score| !score.is_nan())
    }
}

/// The sorted-set and string commands the watching-session store needs.
///
/// Ranges are ordered by `(score, member)`, both reversed when `reverse`
/// is set.
#[async_trait]
pub trait SortedSetBackend: Send + Sync {
    /// Adds or rescores a member.
    async fn zadd(&self, key: &str, member: &str, score: f64) -> RedisResult<()>;

    /// Removes a member, returning whether it was present.
    async fn zrem(&self, key: &str, member: &str) -> RedisResult<bool>;

    /// Returns the number of members.
    async fn zcard(&self, key: &str) -> RedisResult<u64>;

    /// Returns the member count of every key, in key order.
    async fn zcard_many(&self, keys: &[String]) -> RedisResult<Vec<u64>>;

    /// Returns the number of members scored within `[min, max]`.
    async fn zcount(&self, key: &str, min: f64, max: f64) -> RedisResult<u64>;

    /// Returns members between two ranks, inclusive. Negative ranks count
    /// from the end.
    async fn range_by_rank(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        reverse: bool,
    ) -> RedisResult<Vec<ScoredMember>>;

    /// Returns up to `count` members scored at or after `from` in the
    /// range direction.
    async fn range_by_score(
        &self,
        key: &str,
        from: f64,
        reverse: bool,
        count: usize,
    ) -> RedisResult<Vec<ScoredMember>>;

    async fn get(&self, key: &str) -> RedisResult<Option<String>>;

    /// Returns the value of every key, in key order.
    async fn get_many(&self, keys: &[String]) -> RedisResult<Vec<Option<String>>>;

    async fn set(&self, key: &str, value: &str) -> RedisResult<()>;

    /// Deletes a key, returning whether it existed.
    async fn del(&self, key: &str) -> RedisResult<bool>;
}
