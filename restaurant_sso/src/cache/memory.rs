//! In-memory session cache.
//!
//! Expiry is enforced lazily on read: an entry past its deadline reads as a
//! miss and is dropped on the next write to the map. Data is lost when the
//! process exits.

use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

use super::{CacheError, CacheResult, SessionCache};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-memory [`SessionCache`].
///
/// Cloning is cheap; all clones share the same map.
#[derive(Clone)]
pub struct MemorySessionCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    honor_ttl: bool,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            honor_ttl: true,
        }
    }

    /// A cache that keeps entries forever, ignoring the TTL passed to `set`.
    ///
    /// Simulates a misbehaving backend so callers' own expiry checks can be
    /// exercised.
    pub fn with_ttl_disabled() -> Self {
        Self {
            honor_ttl: false,
            ..Self::new()
        }
    }

    /// Number of live (unexpired) entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| self.is_live(e, now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_live(&self, entry: &Entry, now: Instant) -> bool {
        !self.honor_ttl || entry.expires_at > now
    }
}

impl Default for MemorySessionCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .ok_or_else(|| CacheError::Backend(format!("ttl out of range: {ttl:?}")))?;
        let mut entries = self.entries.write().await;
        if self.honor_ttl {
            entries.retain(|_, e| e.expires_at > now);
        }
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .await
            .get(key)
            .filter(|e| self.is_live(e, now))
            .map(|e| e.value.clone()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn ping(&self) -> CacheResult<()> {
        Ok(())
    }
}
