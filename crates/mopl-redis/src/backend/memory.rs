use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::{ScoredMember, SortedSetBackend};
use crate::RedisResult;

#[derive(Debug, Default)]
struct State {
    sets: HashMap<String, HashMap<String, f64>>,
    strings: HashMap<String, String>,
}

impl State {
    /// Members of `key` in `(score, member)` order.
    fn ordered(&self, key: &str, reverse: bool) -> Vec<(&str, f64)> {
        let mut members: Vec<(&str, f64)> = self
            .sets
            .get(key)
            .map(|set| set.iter().map(|(m, s)| (m.as_str(), *s)).collect())
            .unwrap_or_default();

        members.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        if reverse {
            members.reverse();
        }
        members
    }
}

fn render(member: &str, score: f64) -> ScoredMember {
    ScoredMember::new(member, score.to_string())
}

/// In-process stand-in for a Redis server.
///
/// Clones share the same data. Ordering, rank slicing and score bounds
/// follow the Redis commands the adapter issues.
#[derive(Debug, Clone, Default)]
pub struct MemorySortedSet {
    state: Arc<RwLock<State>>,
}

impl MemorySortedSet {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SortedSetBackend for MemorySortedSet {
    async fn zadd(&self, key: &str, member: &str, score: f64) -> RedisResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state
            .sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned(), score);
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> RedisResult<bool> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(set) = state.sets.get_mut(key) else {
            return Ok(false);
        };

        let removed = set.remove(member).is_some();
        if set.is_empty() {
            state.sets.remove(key);
        }
        Ok(removed)
    }

    async fn zcard(&self, key: &str) -> RedisResult<u64> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.sets.get(key).map_or(0, |set| set.len() as u64))
    }

    async fn zcard_many(&self, keys: &[String]) -> RedisResult<Vec<u64>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(keys
            .iter()
            .map(|key| state.sets.get(key).map_or(0, |set| set.len() as u64))
            .collect())
    }

    async fn zcount(&self, key: &str, min: f64, max: f64) -> RedisResult<u64> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.sets.get(key).map_or(0, |set| {
            set.values().filter(|score| (min..=max).contains(*score)).count() as u64
        }))
    }

    async fn range_by_rank(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        reverse: bool,
    ) -> RedisResult<Vec<ScoredMember>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let members = state.ordered(key, reverse);
        let len = members.len() as isize;

        let start = if start < 0 { (len + start).max(0) } else { start };
        let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };
        if start > stop || start >= len {
            return Ok(Vec::new());
        }

        Ok(members[start as usize..=stop as usize]
            .iter()
            .map(|(member, score)| render(member, *score))
            .collect())
    }

    async fn range_by_score(
        &self,
        key: &str,
        from: f64,
        reverse: bool,
        count: usize,
    ) -> RedisResult<Vec<ScoredMember>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let wanted = if reverse {
            [Ordering::Less, Ordering::Equal]
        } else {
            [Ordering::Greater, Ordering::Equal]
        };

        Ok(state
            .ordered(key, reverse)
            .into_iter()
            .filter(|(_, score)| wanted.contains(&score.total_cmp(&from)))
            .take(count)
            .map(|(member, score)| render(member, score))
            .collect())
    }

    async fn get(&self, key: &str) -> RedisResult<Option<String>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(state.strings.get(key).cloned())
    }

    async fn get_many(&self, keys: &[String]) -> RedisResult<Vec<Option<String>>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(keys.iter().map(|key| state.strings.get(key).cloned()).collect())
    }

    async fn set(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.strings.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn del(&self, key: &str) -> RedisResult<bool> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let removed = state.strings.remove(key).is_some() || state.sets.remove(key).is_some();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> MemorySortedSet {
        let backend = MemorySortedSet::new();
        for (member, score) in [("b", 2.0), ("a", 2.0), ("c", 1.0), ("d", 3.0)] {
            backend.zadd("z", member, score).await.unwrap();
        }
        backend
    }

    fn members(range: Vec<ScoredMember>) -> Vec<String> {
        range.into_iter().map(|m| m.member).collect()
    }

    #[tokio::test]
    async fn ranks_follow_score_then_member() {
        let backend = seeded().await;

        let all = backend.range_by_rank("z", 0, -1, false).await.unwrap();
        assert_eq!(members(all), ["c", "a", "b", "d"]);

        let rev = backend.range_by_rank("z", 0, 1, true).await.unwrap();
        assert_eq!(members(rev), ["d", "b"]);

        let past_end = backend.range_by_rank("z", 0, 99, false).await.unwrap();
        assert_eq!(past_end.len(), 4);
        assert!(backend.range_by_rank("missing", 0, -1, false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn score_bounds_are_inclusive() {
        let backend = seeded().await;

        let up = backend.range_by_score("z", 2.0, false, 10).await.unwrap();
        assert_eq!(members(up), ["a", "b", "d"]);

        let down = backend.range_by_score("z", 2.0, true, 2).await.unwrap();
        assert_eq!(members(down), ["b", "a"]);
        assert_eq!(
            backend.range_by_score("z", 2.0, true, 10).await.unwrap()[2].score,
            "1"
        );
    }

    #[tokio::test]
    async fn score_counts_are_inclusive() {
        let backend = seeded().await;
        assert_eq!(backend.zcount("z", 2.0, 2.0).await.unwrap(), 2);
        assert_eq!(backend.zcount("z", 1.0, 2.0).await.unwrap(), 3);
        assert_eq!(backend.zcount("z", 4.0, 9.0).await.unwrap(), 0);
        assert_eq!(backend.zcount("missing", 0.0, 9.0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn removal_and_counts() {
        let backend = seeded().await;
        assert!(backend.zrem("z", "a").await.unwrap());
        assert!(!backend.zrem("z", "a").await.unwrap());
        assert_eq!(backend.zcard("z").await.unwrap(), 3);
        assert_eq!(
            backend
                .zcard_many(&["z".to_owned(), "none".to_owned()])
                .await
                .unwrap(),
            [3, 0]
        );

        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(
            backend
                .get_many(&["k".to_owned(), "none".to_owned(), "k".to_owned()])
                .await
                .unwrap(),
            [Some("v".to_owned()), None, Some("v".to_owned())]
        );
        assert!(backend.del("k").await.unwrap());
        assert_eq!(backend.get("k").await.unwrap(), None);
    }
}
