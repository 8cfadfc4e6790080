//! Key/value cache holding refresh sessions.
//!
//! The cache is the only serialization point of the token engine: `set` and
//! `delete` on one key are atomic and the last write wins. Two backends are
//! provided:
//!
//! - [`RedisSessionCache`] for deployments
//! - [`MemorySessionCache`] for tests and local development

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use memory::MemorySessionCache;
pub use redis::RedisSessionCache;

/// Cache errors
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backend unreachable or returned an error
    #[error("Cache backend error: {0}")]
    Backend(String),
}

impl From<::redis::RedisError> for CacheError {
    fn from(err: ::redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Generic string key/value store with per-key expiry
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Store `value` under `key`, replacing any previous value, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Fetch the value under `key`; `None` on a miss or an expired key
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Remove `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Check that the backend is reachable
    async fn ping(&self) -> CacheResult<()>;
}
