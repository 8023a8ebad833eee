//! Candidate pool caching
//!
//! The fuzzy tier scans the full candidate pool, which is the expensive
//! store read on the hot path. `CandidatePoolCache` wraps any
//! `IdentityLookup` with a TTL read-through cache over `list_candidates`;
//! point lookups pass through untouched so the exact tier stays fresh.
//!
//! The clock is injected so TTL expiry is deterministic under test.

use crate::error::StoreResult;
use crate::store::IdentityLookup;
use crate::types::{Identity, PlayerStatus};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Time source for cache expiry
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time, used in production
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic expiry tests
pub struct ManualClock {
    now: std::sync::Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: std::sync::Mutex::new(Instant::now()) }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(PartialEq, Eq, Hash)]
struct PoolKey {
    position: Option<String>,
    statuses: Vec<PlayerStatus>,
}

struct PoolEntry {
    stored_at: Instant,
    pool: Vec<Identity>,
}

/// TTL read-through cache over an `IdentityLookup`'s candidate pool
pub struct CandidatePoolCache {
    inner: Arc<dyn IdentityLookup>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<PoolKey, PoolEntry>>,
}

impl CandidatePoolCache {
    pub fn new(inner: Arc<dyn IdentityLookup>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { inner, ttl, clock, entries: RwLock::new(HashMap::new()) }
    }
}

#[async_trait]
impl IdentityLookup for CandidatePoolCache {
    async fn find_by_normalized_key(
        &self,
        key: &str,
        position: Option<&str>,
    ) -> StoreResult<Option<Identity>> {
        self.inner.find_by_normalized_key(key, position).await
    }

    async fn list_candidates(
        &self,
        position: Option<&str>,
        statuses: &[PlayerStatus],
    ) -> StoreResult<Vec<Identity>> {
        let key = PoolKey { position: position.map(str::to_string), statuses: statuses.to_vec() };
        let now = self.clock.now();

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if now.duration_since(entry.stored_at) < self.ttl {
                    return Ok(entry.pool.clone());
                }
            }
        }

        let pool = self.inner.list_candidates(position, statuses).await?;
        let mut entries = self.entries.write().await;
        entries.insert(key, PoolEntry { stored_at: now, pool: pool.clone() });
        Ok(pool)
    }
}
