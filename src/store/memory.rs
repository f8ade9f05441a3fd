//! In-process product store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Product, ProductId, ProductRequest};
use crate::store::Store;

/// `Store` backed by a vector under an async lock; preserves insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn create_product(&self, request: ProductRequest) -> Result<Product, StoreError> {
        let product = Product::from_request(Uuid::new_v4(), request);
        self.products.write().await.push(product.clone());
        debug!("Stored product {}", product.id);
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: ProductRequest,
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().await;
        let Some(slot) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *slot = Product::from_request(id, request);
        Ok(Some(slot.clone()))
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}
