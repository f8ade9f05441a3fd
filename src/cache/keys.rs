//! Cache key scheme.
//!
//! Every key the service reads, writes or invalidates is rendered here, so
//! population and invalidation can never disagree on naming.

use std::fmt;

use crate::models::ProductId;

/// Prefix for all product cache keys.
pub const KEY_PREFIX: &str = "product_cache:products";

/// A logical cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// The "all products" list
    Collection,
    /// A single product by id
    Product(ProductId),
}

impl CacheKey {
    /// Renders the backend key string.
    ///
    /// Single-entity keys carry an `id:` segment that the collection key
    /// lacks, so the two namespaces cannot overlap.
    pub fn render(&self) -> String {
        match self {
            CacheKey::Collection => format!("{}:all", KEY_PREFIX),
            CacheKey::Product(id) => format!("{}:id:{}", KEY_PREFIX, id),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
