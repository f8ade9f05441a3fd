//! Cache Entry Module
//!
//! A single in-process cache entry with absolute and sliding expiration.
//!
//! Times come from `tokio::time::Instant`, so tests can drive expiration
//! with a paused clock.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{TtlPolicy, MAX_TTL};

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The serialized value
    pub value: String,
    /// Hard cap; no renewal reaches past it
    pub absolute_deadline: Instant,
    /// Current expiration, moved forward by sliding renewal
    pub expires_at: Instant,
    /// Idle window renewed on each hit
    pub sliding: Option<Duration>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry populated at `now` under `policy`.
    pub fn new(value: String, policy: &TtlPolicy, now: Instant) -> Self {
        Self {
            value,
            absolute_deadline: deadline(now, policy.absolute),
            expires_at: deadline(now, policy.initial_lifetime()),
            sliding: policy.sliding,
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its current expiration.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Touch ==
    /// Renews the sliding window after a hit.
    ///
    /// The new expiration is `now + sliding`, clamped to the absolute
    /// deadline. Entries without a sliding window are left untouched.
    pub fn touch(&mut self, now: Instant) {
        if let Some(sliding) = self.sliding {
            self.expires_at = deadline(now, sliding).min(self.absolute_deadline);
        }
    }
}

/// `now + ttl` with `ttl` capped at `MAX_TTL`. A deadline the clock cannot
/// represent lands on `now`, so the entry is expired rather than panicking.
fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_absolute_only_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::new("v".to_string(), &TtlPolicy::absolute_only(secs(10)), now);

        assert!(!entry.is_expired(now + secs(9)));
        assert!(entry.is_expired(now + secs(10)));
    }

    #[test]
    fn test_touch_without_sliding_is_noop() {
        let now = Instant::now();
        let mut entry = CacheEntry::new("v".to_string(), &TtlPolicy::absolute_only(secs(10)), now);

        entry.touch(now + secs(5));
        assert_eq!(entry.expires_at, now + secs(10));
    }

    #[test]
    fn test_sliding_window_renews_on_touch() {
        let now = Instant::now();
        let policy = TtlPolicy::with_sliding(secs(100), secs(10));
        let mut entry = CacheEntry::new("v".to_string(), &policy, now);

        assert_eq!(entry.expires_at, now + secs(10));

        entry.touch(now + secs(8));
        assert_eq!(entry.expires_at, now + secs(18));
        assert!(!entry.is_expired(now + secs(15)));
    }

    #[test]
    fn test_sliding_never_passes_absolute_deadline() {
        let now = Instant::now();
        let policy = TtlPolicy::with_sliding(secs(20), secs(10));
        let mut entry = CacheEntry::new("v".to_string(), &policy, now);

        entry.touch(now + secs(9));
        entry.touch(now + secs(18));
        assert_eq!(entry.expires_at, now + secs(20));
        assert!(entry.is_expired(now + secs(20)));
    }

    #[test]
    fn test_huge_ttl_saturates_instead_of_overflowing() {
        let now = Instant::now();
        let policy = TtlPolicy {
            absolute: Duration::MAX,
            sliding: Some(Duration::MAX),
        };
        let mut entry = CacheEntry::new("v".to_string(), &policy, now);

        assert_eq!(entry.absolute_deadline, now + MAX_TTL);
        entry.touch(now + secs(1));
        assert!(entry.expires_at <= entry.absolute_deadline);
        assert!(!entry.is_expired(now + secs(3600)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("v".to_string(), &TtlPolicy::absolute_only(Duration::ZERO), now);

        assert!(entry.is_expired(now), "Entry should be expired at boundary");
    }
}
