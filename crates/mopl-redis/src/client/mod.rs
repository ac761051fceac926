//! Redis client backed by a reconnecting [`ConnectionManager`].
//!
//! [`ConnectionManager`]: redis::aio::ConnectionManager

mod redis_client;
mod redis_config;

pub use redis_client::RedisClient;
pub use redis_config::RedisConfig;
