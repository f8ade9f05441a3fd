//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::TtlPolicy;
use crate::service::CollectionPolicy;

/// Which `CacheBackend` variant the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Redis,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(format!("unknown cache backend '{}'", other)),
        }
    }
}

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Cache backend variant
    pub cache_backend: BackendKind,
    /// Redis connection target
    pub redis_url: String,
    /// Bound on each Redis call, in milliseconds
    pub redis_timeout_ms: u64,
    /// Absolute expiration horizon in seconds
    pub absolute_ttl: u64,
    /// Sliding renewal window in seconds, 0 = disabled
    pub sliding_ttl: u64,
    /// Pure absolute TTL in seconds used with the Redis backend
    pub redis_ttl: u64,
    /// Maximum number of entries the memory backend holds
    pub max_entries: usize,
    /// Memory backend sweep interval in seconds
    pub cleanup_interval: u64,
    /// How writes treat the cached collection
    pub collection_policy: CollectionPolicy,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis target (default: redis://127.0.0.1:6379)
    /// - `REDIS_TIMEOUT_MS` - Per-call Redis timeout (default: 250)
    /// - `CACHE_ABSOLUTE_TTL` - Absolute TTL in seconds (default: 300)
    /// - `CACHE_SLIDING_TTL` - Sliding window in seconds, 0 disables (default: 60)
    /// - `REDIS_TTL` - Redis TTL in seconds (default: 60)
    /// - `CACHE_MAX_ENTRIES` - Memory backend capacity (default: 1000)
    /// - `CLEANUP_INTERVAL` - Memory sweep frequency in seconds (default: 1)
    /// - `COLLECTION_POLICY` - `lazy` or `invalidate` (default: lazy)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_backend: env_or("CACHE_BACKEND", defaults.cache_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            redis_timeout_ms: env_or("REDIS_TIMEOUT_MS", defaults.redis_timeout_ms),
            absolute_ttl: env_or("CACHE_ABSOLUTE_TTL", defaults.absolute_ttl),
            sliding_ttl: env_or("CACHE_SLIDING_TTL", defaults.sliding_ttl),
            redis_ttl: env_or("REDIS_TTL", defaults.redis_ttl),
            max_entries: env_or("CACHE_MAX_ENTRIES", defaults.max_entries),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            collection_policy: env_or("COLLECTION_POLICY", defaults.collection_policy),
        }
    }

    /// Standard TTL policy for the configured backend.
    ///
    /// Memory: absolute horizon plus sliding window (if non-zero).
    /// Redis: pure absolute `redis_ttl`.
    /// Values beyond `MAX_TTL` are capped by the `TtlPolicy` constructors.
    pub fn ttl_policy(&self) -> TtlPolicy {
        match self.cache_backend {
            BackendKind::Redis => TtlPolicy::absolute_only(Duration::from_secs(self.redis_ttl)),
            BackendKind::Memory if self.sliding_ttl == 0 => {
                TtlPolicy::absolute_only(Duration::from_secs(self.absolute_ttl))
            }
            BackendKind::Memory => TtlPolicy::with_sliding(
                Duration::from_secs(self.absolute_ttl),
                Duration::from_secs(self.sliding_ttl),
            ),
        }
    }

    pub fn redis_timeout(&self) -> Duration {
        Duration::from_millis(self.redis_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_backend: BackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            redis_timeout_ms: 250,
            absolute_ttl: 300,
            sliding_ttl: 60,
            redis_ttl: 60,
            max_entries: 1000,
            cleanup_interval: 1,
            collection_policy: CollectionPolicy::LazyExpiry,
        }
    }
}

/// Parses `name` from the environment, falling back to `default` when it is
/// unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
