//! TTL policy carried by every cache write.

use std::time::Duration;

/// Longest lifetime any entry is granted (ten years).
pub const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Expiration policy for a cache entry.
///
/// `absolute` caps the lifetime from population time. `sliding`, when set,
/// is the idle window renewed on every hit; it never extends an entry past
/// the absolute cap. The constructors clamp both bounds to `MAX_TTL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub absolute: Duration,
    pub sliding: Option<Duration>,
}

impl TtlPolicy {
    /// Pure absolute expiration, no renewal on access.
    pub fn absolute_only(absolute: Duration) -> Self {
        Self {
            absolute: absolute.min(MAX_TTL),
            sliding: None,
        }
    }

    /// Absolute cap combined with a sliding renewal window.
    pub fn with_sliding(absolute: Duration, sliding: Duration) -> Self {
        Self {
            absolute: absolute.min(MAX_TTL),
            sliding: Some(sliding.min(MAX_TTL)),
        }
    }

    /// Lifetime granted at population time: whichever bound comes first.
    pub fn initial_lifetime(&self) -> Duration {
        match self.sliding {
            Some(sliding) => sliding.min(self.absolute),
            None => self.absolute,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::with_sliding(Duration::from_secs(300), Duration::from_secs(60))
    }
}
