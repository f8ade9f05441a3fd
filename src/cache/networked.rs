//! Redis-based cache backend.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};
use tracing::{debug, info};

use crate::cache::{CacheBackend, TtlPolicy};
use crate::error::CacheError;

/// Default bound on a single Redis round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(250);

/// Networked `CacheBackend` over a multiplexed Redis connection.
///
/// Expiration is pure absolute (`SET … EX`); a sliding window in the policy
/// is not applied. Every call is bounded by `timeout`, and a timeout or
/// connection error surfaces as `CacheError::Unavailable`.
#[derive(Clone)]
pub struct RedisBackend {
    /// `None` when no connection could be established
    conn: Option<ConnectionManager>,
    timeout: Duration,
}

impl RedisBackend {
    /// Connects to `url`, giving up after `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheError::Unavailable(format!("Connecting to {} timed out", url))
            })??;

        info!("Connected to Redis at {}", url);
        Ok(Self {
            conn: Some(conn),
            timeout,
        })
    }

    /// A backend with no connection: every call reports `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            conn: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    fn connection(&self) -> Result<ConnectionManager, CacheError> {
        self.conn
            .clone()
            .ok_or_else(|| CacheError::Unavailable("Redis connection is disabled".to_string()))
    }

    /// Runs one Redis command under the configured timeout.
    async fn bounded<T, F>(&self, op: &str, key: &str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| {
                CacheError::Unavailable(format!("Redis {} '{}' failed: {}", op, key, e))
            }),
            Err(_) => Err(CacheError::Unavailable(format!(
                "Redis {} '{}' timed out after {}ms",
                op,
                key,
                self.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.connection()?;
        let value: Option<String> = self.bounded("GET", key, conn.get(key)).await?;

        match &value {
            Some(_) => debug!("Redis hit for key '{}'", key),
            None => debug!("Redis miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, policy: &TtlPolicy) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        let ttl_secs = expiry_secs(policy);

        self.bounded::<(), _>("SET", key, conn.set_ex(key, value, ttl_secs))
            .await?;

        debug!("Cached key '{}' in Redis with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection()?;
        let deleted: i64 = self.bounded("DEL", key, conn.del(key)).await?;

        debug!("Deleted key '{}' from Redis: {}", key, deleted > 0);
        Ok(())
    }
}

/// Whole seconds for `SET … EX`, rounded up and never below one.
fn expiry_secs(policy: &TtlPolicy) -> u64 {
    let secs = policy.absolute.as_millis().div_ceil(1000).max(1);
    u64::try_from(secs).unwrap_or(u64::MAX)
}
