//! Persistent product store
//!
//! The service only sees the `Store` trait; `InMemoryStore` is the bundled
//! implementation used by the binary and the tests.

mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{Product, ProductId, ProductRequest};

/// Durable CRUD backend for products.
///
/// Assigns identity on create. Absent ids come back as `Ok(None)` /
/// `Ok(false)`; `Err` is reserved for the store itself failing.
#[async_trait]
pub trait Store: Send + Sync {
    /// All products, in store order.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Persists a new product and returns it with its assigned id.
    async fn create_product(&self, request: ProductRequest) -> Result<Product, StoreError>;

    /// Replaces every field of an existing product; `None` if absent.
    async fn update_product(
        &self,
        id: ProductId,
        request: ProductRequest,
    ) -> Result<Option<Product>, StoreError>;

    /// Returns `true` if a product was deleted, `false` if it was absent.
    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError>;
}
