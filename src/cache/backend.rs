//! Cache backend abstraction.

use async_trait::async_trait;

use crate::cache::{CacheStats, TtlPolicy};
use crate::error::CacheError;

/// Key/value store with per-entry expiration.
///
/// Both the in-process and the networked variant implement this contract,
/// so the service holds an `Arc<dyn CacheBackend>` and never branches on
/// the variant. Values are serialized text.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Short variant name for logs and stats ("memory", "redis").
    fn name(&self) -> &'static str;

    /// Returns the live value for `key`, or `None` on miss or expiry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Inserts or overwrites `key` under `policy`.
    ///
    /// A write lands completely or not at all.
    async fn set(&self, key: &str, value: String, policy: &TtlPolicy) -> Result<(), CacheError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Backend counters, for variants that keep them.
    async fn stats(&self) -> Option<CacheStats> {
        None
    }
}
