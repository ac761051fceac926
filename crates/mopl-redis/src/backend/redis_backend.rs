use async_trait::async_trait;
use redis::AsyncCommands;

use super::{ScoredMember, SortedSetBackend};
use crate::{RedisClient, RedisError, RedisResult, TRACING_TARGET_STORE};

fn scored(pairs: Vec<(String, String)>) -> Vec<ScoredMember> {
    pairs
        .into_iter()
        .map(|(member, score)| ScoredMember { member, score })
        .collect()
}

#[async_trait]
impl SortedSetBackend for RedisClient {
    async fn zadd(&self, key: &str, member: &str, score: f64) -> RedisResult<()> {
        let mut conn = self.connection();
        let _: () = conn
            .zadd(key, member, score)
            .await
            .map_err(|e| RedisError::command("ZADD", e))?;
        Ok(())
    }

    async fn zrem(&self, key: &str, member: &str) -> RedisResult<bool> {
        let mut conn = self.connection();
        let removed: u64 = conn
            .zrem(key, member)
            .await
            .map_err(|e| RedisError::command("ZREM", e))?;
        Ok(removed > 0)
    }

    async fn zcard(&self, key: &str) -> RedisResult<u64> {
        let mut conn = self.connection();
        conn.zcard(key)
            .await
            .map_err(|e| RedisError::command("ZCARD", e))
    }

    async fn zcard_many(&self, keys: &[String]) -> RedisResult<Vec<u64>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("ZCARD").arg(key);
        }

        let mut conn = self.connection();
        let counts: Vec<u64> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| RedisError::command("ZCARD", e))?;

        tracing::trace!(target: TRACING_TARGET_STORE, keys = keys.len(), "Pipelined ZCARD");
        Ok(counts)
    }

    async fn zcount(&self, key: &str, min: f64, max: f64) -> RedisResult<u64> {
        let mut conn = self.connection();
        conn.zcount(key, min, max)
            .await
            .map_err(|e| RedisError::command("ZCOUNT", e))
    }

    async fn range_by_rank(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        reverse: bool,
    ) -> RedisResult<Vec<ScoredMember>> {
        let command = if reverse { "ZREVRANGE" } else { "ZRANGE" };
        let mut conn = self.connection();
        let pairs: Vec<(String, String)> = redis::cmd(command)
            .arg(key)
            .arg(start)
            .arg(stop)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(|e| RedisError::command(command, e))?;
        Ok(scored(pairs))
    }

    async fn range_by_score(
        &self,
        key: &str,
        from: f64,
        reverse: bool,
        count: usize,
    ) -> RedisResult<Vec<ScoredMember>> {
        let (command, bound) = if reverse {
            ("ZREVRANGEBYSCORE", "-inf")
        } else {
            ("ZRANGEBYSCORE", "+inf")
        };

        let mut conn = self.connection();
        let pairs: Vec<(String, String)> = redis::cmd(command)
            .arg(key)
            .arg(from)
            .arg(bound)
            .arg("WITHSCORES")
            .arg("LIMIT")
            .arg(0)
            .arg(count)
            .query_async(&mut conn)
            .await
            .map_err(|e| RedisError::command(command, e))?;
        Ok(scored(pairs))
    }

    async fn get(&self, key: &str) -> RedisResult<Option<String>> {
        let mut conn = self.connection();
        conn.get(key)
            .await
            .map_err(|e| RedisError::command("GET", e))
    }

    async fn get_many(&self, keys: &[String]) -> RedisResult<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for key in keys {
            pipe.cmd("GET").arg(key);
        }

        let mut conn = self.connection();
        let values: Vec<Option<String>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| RedisError::command("GET", e))?;

        tracing::trace!(target: TRACING_TARGET_STORE, keys = keys.len(), "Pipelined GET");
        Ok(values)
    }

    async fn set(&self, key: &str, value: &str) -> RedisResult<()> {
        let mut conn = self.connection();
        let _: () = conn
            .set(key, value)
            .await
            .map_err(|e| RedisError::command("SET", e))?;
        Ok(())
    }

    async fn del(&self, key: &str) -> RedisResult<bool> {
        let mut conn = self.connection();
        let removed: u64 = conn
            .del(key)
            .await
            .map_err(|e| RedisError::command("DEL", e))?;
        Ok(removed > 0)
    }
}
