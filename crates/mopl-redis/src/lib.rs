#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for connection establishment.
pub const TRACING_TARGET_CONNECTION: &str = "mopl_redis::connection";

/// Tracing target for sorted-set reads and writes.
pub const TRACING_TARGET_STORE: &str = "mopl_redis::store";

mod backend;
mod client;
mod error;
mod keys;
mod watching_session;

pub use crate::backend::{MemorySortedSet, ScoredMember, SortedSetBackend};
pub use crate::client::{RedisClient, RedisConfig};
pub use crate::error::{RedisError, RedisResult};
pub use crate::keys::WatchingSessionKeys;
pub use crate::watching_session::{
    OverfetchPolicy, WatchingSessionPageSource, WatchingSessionRepository,
};
