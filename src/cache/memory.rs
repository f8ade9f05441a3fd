//! In-process cache backend
//!
//! HashMap storage with LRU capacity bound, sliding/absolute TTL and
//! hit/miss statistics, behind a single async lock.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{
    CacheBackend, CacheEntry, CacheStats, LruTracker, TtlPolicy, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::error::CacheError;

#[derive(Debug, Default)]
struct MemoryState {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
}

impl MemoryState {
    fn drop_entry(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }
}

// == Memory Backend ==
/// In-process `CacheBackend`.
///
/// Expired entries are treated as absent and dropped on access;
/// `cleanup_expired` lets the backend's sweeper reclaim the rest.
#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    /// Maximum number of entries allowed
    max_entries: usize,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an empty backend holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            max_entries: max_entries.max(1),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries and returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.write().await;

        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.drop_entry(key);
        }
        state.stats.record_expirations(expired.len());
        expired.len()
    }

    /// Whether a live (unexpired) entry exists for `key`, without counting
    /// a hit or renewing it.
    pub async fn contains(&self, key: &str) -> bool {
        let now = Instant::now();
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    // == Length ==
    /// Number of stored entries, including expired ones not yet reclaimed.
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(entry) = state.entries.get_mut(key) else {
            state.stats.record_miss();
            return Ok(None);
        };

        if entry.is_expired(now) {
            state.drop_entry(key);
            state.stats.record_expirations(1);
            state.stats.record_miss();
            debug!("Cache entry '{}' expired", key);
            return Ok(None);
        }

        entry.touch(now);
        let value = entry.value.clone();
        state.lru.touch(key);
        state.stats.record_hit();
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: String, policy: &TtlPolicy) -> Result<(), CacheError> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected(format!(
                "Value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let entry = CacheEntry::new(value, policy, Instant::now());
        let mut state = self.state.write().await;

        if !state.entries.contains_key(key) && state.entries.len() >= self.max_entries {
            if let Some(evicted) = state.lru.evict_oldest() {
                state.entries.remove(&evicted);
                state.stats.record_eviction();
                debug!("Evicted least recently used key '{}'", evicted);
            }
        }

        state.entries.insert(key.to_string(), entry);
        state.lru.touch(key);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut state = self.state.write().await;
        state.drop_entry(key);
        Ok(())
    }

    async fn stats(&self) -> Option<CacheStats> {
        let state = self.state.read().await;
        let mut stats = state.stats.clone();
        stats.total_entries = state.entries.len();
        Some(stats)
    }
}
