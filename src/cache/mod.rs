//! Cache Module
//!
//! Cache key scheme, TTL policy and the two `CacheBackend` variants
//! (in-process memory and networked Redis).

mod backend;
mod entry;
mod keys;
mod lru;
mod memory;
mod networked;
mod policy;
mod stats;


// Re-export public types
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use keys::{CacheKey, KEY_PREFIX};
pub use lru::LruTracker;
pub use memory::MemoryBackend;
pub use networked::RedisBackend;
pub use policy::{TtlPolicy, MAX_TTL};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
