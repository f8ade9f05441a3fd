//! Product cache service
//!
//! Cache-aside orchestration of a `Store` and a `CacheBackend`:
//!
//! - reads try the cache, fall back to the store on miss and populate;
//! - writes go to the store first, then adjust the single-entity entry;
//! - cache failures are logged and never fail an operation.
//!
//! The collection entry is governed by `CollectionPolicy`.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheKey, CacheStats, TtlPolicy};
use crate::error::{CacheError, ProductError, Result};
use crate::models::{Product, ProductId, ProductRequest};
use crate::store::Store;

/// How single-entity writes treat the cached collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollectionPolicy {
    /// Leave the collection entry alone; it is refreshed on its next miss
    /// after the TTL lapses (bounded staleness).
    #[default]
    LazyExpiry,
    /// Remove the collection entry after every successful create, update
    /// or delete.
    InvalidateOnWrite,
}

impl std::str::FromStr for CollectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lazy" => Ok(Self::LazyExpiry),
            "invalidate" => Ok(Self::InvalidateOnWrite),
            other => Err(format!("unknown collection policy '{}'", other)),
        }
    }
}

/// Cache-aside data access for products.
///
/// Store and cache are injected; the service holds no global state and
/// takes no lock across calls.
pub struct ProductCacheService {
    store: Arc<dyn Store>,
    cache: Arc<dyn CacheBackend>,
    ttl: TtlPolicy,
    collection_policy: CollectionPolicy,
}

impl ProductCacheService {
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn CacheBackend>, ttl: TtlPolicy) -> Self {
        Self {
            store,
            cache,
            ttl,
            collection_policy: CollectionPolicy::default(),
        }
    }

    pub fn with_collection_policy(mut self, policy: CollectionPolicy) -> Self {
        self.collection_policy = policy;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.cache.name()
    }

    pub async fn cache_stats(&self) -> Option<CacheStats> {
        self.cache.stats().await
    }

    // == Read Path ==

    /// Returns all products.
    ///
    /// An empty store yields `ProductError::NoData` and is never cached, so
    /// a later create shows up on the next call.
    pub async fn get_collection(&self) -> Result<Vec<Product>> {
        let key = CacheKey::Collection;
        if let Some(products) = self.read_cached::<Vec<Product>>(key).await {
            return Ok(products);
        }

        let products = self.store.list_products().await?;
        if products.is_empty() {
            debug!("Store holds no products; collection left uncached");
            return Err(ProductError::NoData);
        }

        self.populate(key, &products).await;
        Ok(products)
    }

    /// Returns one product. Unknown ids leave the cache untouched.
    pub async fn get_product(&self, id: ProductId) -> Result<Product> {
        let key = CacheKey::Product(id);
        if let Some(product) = self.read_cached::<Product>(key).await {
            return Ok(product);
        }

        let product = self
            .store
            .get_product(id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        self.populate(key, &product).await;
        Ok(product)
    }

    // == Write Path ==

    /// Creates a product and caches it under its new id.
    pub async fn create_product(&self, request: ProductRequest) -> Result<Product> {
        validate(&request)?;

        let product = self.store.create_product(request).await?;
        self.populate(CacheKey::Product(product.id), &product).await;
        self.after_write().await;
        Ok(product)
    }

    /// Replaces a product and overwrites its cache entry with the new value.
    pub async fn update_product(&self, id: ProductId, request: ProductRequest) -> Result<Product> {
        validate(&request)?;

        let product = self
            .store
            .update_product(id, request)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        self.populate(CacheKey::Product(id), &product).await;
        self.after_write().await;
        Ok(product)
    }

    /// Deletes a product and invalidates its cache entry.
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        if !self.store.delete_product(id).await? {
            return Err(ProductError::NotFound(id));
        }

        self.invalidate(CacheKey::Product(id)).await;
        self.after_write().await;
        Ok(())
    }

    // == Cache Helpers ==

    /// Cache lookup that turns every failure into a miss.
    ///
    /// An entry that no longer decodes is dropped so the next read
    /// repopulates it.
    async fn read_cached<T: DeserializeOwned>(&self, key: CacheKey) -> Option<T> {
        let rendered = key.render();
        let raw = match self.cache.get(&rendered).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss for '{}'", rendered);
                return None;
            }
            Err(e) => {
                warn!("Cache read for '{}' failed, using store: {}", rendered, e);
                return None;
            }
        };

        match decode(&raw) {
            Ok(value) => {
                debug!("Cache hit for '{}'", rendered);
                Some(value)
            }
            Err(e) => {
                warn!("Discarding undecodable cache entry '{}': {}", rendered, e);
                self.invalidate(key).await;
                None
            }
        }
    }

    async fn populate<T: Serialize + Sync>(&self, key: CacheKey, value: &T) {
        let rendered = key.render();
        let json = match encode(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Could not encode value for '{}': {}", rendered, e);
                return;
            }
        };

        match self.cache.set(&rendered, json, &self.ttl).await {
            Ok(()) => debug!("Populated '{}'", rendered),
            Err(e) => warn!("Cache write for '{}' failed: {}", rendered, e),
        }
    }

    async fn invalidate(&self, key: CacheKey) {
        let rendered = key.render();
        match self.cache.remove(&rendered).await {
            Ok(()) => debug!("Invalidated '{}'", rendered),
            Err(e) => warn!("Cache invalidation for '{}' failed: {}", rendered, e),
        }
    }

    async fn after_write(&self) {
        if self.collection_policy == CollectionPolicy::InvalidateOnWrite {
            self.invalidate(CacheKey::Collection).await;
        }
    }
}

fn encode<T: Serialize>(value: &T) -> std::result::Result<String, CacheError> {
    Ok(serde_json::to_string(value)?)
}

fn decode<T: DeserializeOwned>(raw: &str) -> std::result::Result<T, CacheError> {
    Ok(serde_json::from_str(raw)?)
}

fn validate(request: &ProductRequest) -> Result<()> {
    match request.validate() {
        Some(message) => Err(ProductError::Validation(message)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::cache::MemoryBackend;
    use crate::error::{CacheError, StoreError};
    use crate::store::InMemoryStore;

    /// Store wrapper counting reads that reach the store.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryStore,
        lists: AtomicUsize,
        gets: AtomicUsize,
    }

    impl CountingStore {
        fn lists(&self) -> usize {
            self.lists.load(Ordering::SeqCst)
        }

        fn gets(&self) -> usize {
            self.gets.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Store for CountingStore {
        async fn list_products(&self) -> std::result::Result<Vec<Product>, StoreError> {
            self.lists.fetch_add(1, Ordering::SeqCst);
            self.inner.list_products().await
        }

        async fn get_product(
            &self,
            id: ProductId,
        ) -> std::result::Result<Option<Product>, StoreError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get_product(id).await
        }

        async fn create_product(
            &self,
            request: ProductRequest,
        ) -> std::result::Result<Product, StoreError> {
            self.inner.create_product(request).await
        }

        async fn update_product(
            &self,
            id: ProductId,
            request: ProductRequest,
        ) -> std::result::Result<Option<Product>, StoreError> {
            self.inner.update_product(id, request).await
        }

        async fn delete_product(&self, id: ProductId) -> std::result::Result<bool, StoreError> {
            self.inner.delete_product(id).await
        }
    }

    /// Backend that is never reachable.
    struct UnavailableBackend;

    #[async_trait]
    impl CacheBackend for UnavailableBackend {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        async fn get(&self, _key: &str) -> std::result::Result<Option<String>, CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set(
            &self,
            _key: &str,
            _value: String,
            _policy: &TtlPolicy,
        ) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn remove(&self, _key: &str) -> std::result::Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl Store for BrokenStore {
        async fn list_products(&self) -> std::result::Result<Vec<Product>, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        async fn get_product(
            &self,
            _id: ProductId,
        ) -> std::result::Result<Option<Product>, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        async fn create_product(
            &self,
            _request: ProductRequest,
        ) -> std::result::Result<Product, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        async fn update_product(
            &self,
            _id: ProductId,
            _request: ProductRequest,
        ) -> std::result::Result<Option<Product>, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        async fn delete_product(&self, _id: ProductId) -> std::result::Result<bool, StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }
    }

    struct Harness {
        store: Arc<CountingStore>,
        cache: Arc<MemoryBackend>,
        service: ProductCacheService,
    }

    fn harness_with(ttl: TtlPolicy, policy: CollectionPolicy) -> Harness {
        let store = Arc::new(CountingStore::default());
        let cache = Arc::new(MemoryBackend::new(100));
        let service = ProductCacheService::new(store.clone(), cache.clone(), ttl)
            .with_collection_policy(policy);
        Harness {
            store,
            cache,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(TtlPolicy::default(), CollectionPolicy::LazyExpiry)
    }

    fn request(name: &str) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            description: Some("test product".to_string()),
            price: Decimal::new(1250, 2),
            quantity: 5,
        }
    }

    fn collection_key() -> String {
        CacheKey::Collection.render()
    }

    fn product_key(id: ProductId) -> String {
        CacheKey::Product(id).render()
    }

    #[tokio::test]
    async fn test_get_unknown_product_is_not_found_and_uncached() {
        let h = harness();
        let id = Uuid::new_v4();

        let result = h.service.get_product(id).await;

        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
        assert!(!h.cache.contains(&product_key(id)).await);
        assert!(h.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_created_product_served_from_cache() {
        let h = harness();
        let created = h.service.create_product(request("Lamp")).await.unwrap();

        let fetched = h.service.get_product(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(h.store.gets(), 0, "read should not reach the store");
    }

    #[tokio::test]
    async fn test_get_product_populates_on_miss() {
        let h = harness();
        let created = h.store.create_product(request("Desk")).await.unwrap();

        h.service.get_product(created.id).await.unwrap();
        h.service.get_product(created.id).await.unwrap();

        assert_eq!(h.store.gets(), 1);
        assert!(h.cache.contains(&product_key(created.id)).await);
    }

    #[tokio::test]
    async fn test_delete_invalidates_single_entry() {
        let h = harness();
        let created = h.service.create_product(request("Chair")).await.unwrap();

        h.service.delete_product(created.id).await.unwrap();

        assert!(!h.cache.contains(&product_key(created.id)).await);
        let result = h.service.get_product(created.id).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
        assert_eq!(h.store.gets(), 1, "lookup after delete must reach the store");
    }

    #[tokio::test]
    async fn test_delete_twice_reports_not_found() {
        let h = harness();
        let keep = h.service.create_product(request("Keep")).await.unwrap();
        let gone = h.service.create_product(request("Gone")).await.unwrap();

        h.service.delete_product(gone.id).await.unwrap();
        let entries_after_first = h.cache.len().await;

        let second = h.service.delete_product(gone.id).await;

        assert!(matches!(second, Err(ProductError::NotFound(_))));
        assert_eq!(h.cache.len().await, entries_after_first);
        assert!(h.cache.contains(&product_key(keep.id)).await);
    }

    #[tokio::test]
    async fn test_empty_collection_is_not_cached() {
        let h = harness();

        let result = h.service.get_collection().await;

        assert!(matches!(result, Err(ProductError::NoData)));
        assert!(!h.cache.contains(&collection_key()).await);

        let created = h.service.create_product(request("First")).await.unwrap();
        let products = h.service.get_collection().await.unwrap();
        assert_eq!(products, vec![created]);
    }

    #[tokio::test]
    async fn test_collection_served_from_cache_on_hit() {
        let h = harness();
        h.service.create_product(request("A")).await.unwrap();

        let first = h.service.get_collection().await.unwrap();
        let second = h.service.get_collection().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(h.store.lists(), 1);
    }

    #[tokio::test]
    async fn test_lazy_policy_leaves_collection_stale_after_create() {
        let h = harness();
        h.service.create_product(request("A")).await.unwrap();
        h.service.get_collection().await.unwrap();

        h.service.create_product(request("B")).await.unwrap();
        let products = h.service.get_collection().await.unwrap();

        assert_eq!(products.len(), 1, "collection stays stale until expiry");
        assert_eq!(h.store.lists(), 1);
    }

    #[tokio::test]
    async fn test_lazy_policy_keeps_collection_after_delete() {
        let h = harness();
        let a = h.service.create_product(request("A")).await.unwrap();
        h.service.get_collection().await.unwrap();

        h.service.delete_product(a.id).await.unwrap();

        assert!(h.cache.contains(&collection_key()).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lazy_collection_refreshes_after_ttl() {
        let ttl = TtlPolicy::absolute_only(Duration::from_secs(10));
        let h = harness_with(ttl, CollectionPolicy::LazyExpiry);
        h.service.create_product(request("A")).await.unwrap();
        h.service.get_collection().await.unwrap();
        h.service.create_product(request("B")).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        let products = h.service.get_collection().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(h.store.lists(), 2);
    }

    #[tokio::test]
    async fn test_invalidate_policy_drops_collection_on_every_write() {
        let h = harness_with(TtlPolicy::default(), CollectionPolicy::InvalidateOnWrite);
        let a = h.service.create_product(request("A")).await.unwrap();

        h.service.get_collection().await.unwrap();
        h.service.create_product(request("B")).await.unwrap();
        assert!(!h.cache.contains(&collection_key()).await);
        assert_eq!(h.service.get_collection().await.unwrap().len(), 2);

        h.service.update_product(a.id, request("A2")).await.unwrap();
        assert!(!h.cache.contains(&collection_key()).await);
        h.service.get_collection().await.unwrap();

        h.service.delete_product(a.id).await.unwrap();
        assert!(!h.cache.contains(&collection_key()).await);
        assert_eq!(h.service.get_collection().await.unwrap().len(), 1);
        assert_eq!(h.store.lists(), 4);
    }

    #[tokio::test]
    async fn test_update_refreshes_single_entry() {
        let h = harness();
        let created = h.service.create_product(request("Old")).await.unwrap();

        let updated = h
            .service
            .update_product(created.id, request("New"))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "New");
        let fetched = h.service.get_product(created.id).await.unwrap();
        assert_eq!(fetched.name, "New");
        assert_eq!(h.store.gets(), 0);
    }

    #[tokio::test]
    async fn test_update_unknown_product_has_no_cache_effect() {
        let h = harness();
        let id = Uuid::new_v4();

        let result = h.service.update_product(id, request("Ghost")).await;

        assert!(matches!(result, Err(ProductError::NotFound(_))));
        assert!(h.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_store() {
        let h = harness();
        let mut bad = request("");
        bad.price = Decimal::new(-1, 0);

        let result = h.service.create_product(bad).await;

        assert!(matches!(result, Err(ProductError::Validation(_))));
        assert!(h.store.list_products().await.unwrap().is_empty());
        assert!(h.cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_goes_back_to_store() {
        let ttl = TtlPolicy::absolute_only(Duration::from_secs(10));
        let h = harness_with(ttl, CollectionPolicy::LazyExpiry);
        let p1 = h.store.create_product(request("p1")).await.unwrap();

        h.service.get_product(p1.id).await.unwrap();
        assert_eq!(h.store.gets(), 1);

        tokio::time::advance(Duration::from_secs(11)).await;

        let fetched = h.service.get_product(p1.id).await.unwrap();
        assert_eq!(fetched, p1);
        assert_eq!(h.store.gets(), 2, "expired entry must be refetched");
        assert!(h.cache.contains(&product_key(p1.id)).await, "entry repopulated");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sliding_window_keeps_hot_entry_until_cap() {
        let ttl = TtlPolicy::with_sliding(Duration::from_secs(30), Duration::from_secs(10));
        let h = harness_with(ttl, CollectionPolicy::LazyExpiry);
        let p1 = h.store.create_product(request("p1")).await.unwrap();
        h.service.get_product(p1.id).await.unwrap();

        for _ in 0..3 {
            tokio::time::advance(Duration::from_secs(8)).await;
            h.service.get_product(p1.id).await.unwrap();
        }
        assert_eq!(h.store.gets(), 1);

        tokio::time::advance(Duration::from_secs(8)).await;
        h.service.get_product(p1.id).await.unwrap();
        assert_eq!(h.store.gets(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_backend_falls_through_to_store() {
        let store = Arc::new(CountingStore::default());
        let service = ProductCacheService::new(
            store.clone(),
            Arc::new(UnavailableBackend),
            TtlPolicy::default(),
        );

        let created = service.create_product(request("Resilient")).await.unwrap();
        let fetched = service.get_product(created.id).await.unwrap();
        let listed = service.get_collection().await.unwrap();
        service.update_product(created.id, request("Still")).await.unwrap();
        service.delete_product(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(listed, vec![created]);
        assert_eq!(store.gets(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_treated_as_miss() {
        let h = harness();
        let created = h.store.create_product(request("Odd")).await.unwrap();
        h.cache
            .set(&product_key(created.id), "{not json".to_string(), &TtlPolicy::default())
            .await
            .unwrap();

        let fetched = h.service.get_product(created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(h.store.gets(), 1);
        assert_eq!(h.service.get_product(created.id).await.unwrap(), created);
        assert_eq!(h.store.gets(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let service = ProductCacheService::new(
            Arc::new(BrokenStore),
            Arc::new(MemoryBackend::new(10)),
            TtlPolicy::default(),
        );

        assert!(matches!(
            service.get_collection().await,
            Err(ProductError::Store(_))
        ));
        assert!(matches!(
            service.get_product(Uuid::new_v4()).await,
            Err(ProductError::Store(_))
        ));
        assert!(matches!(
            service.create_product(request("x")).await,
            Err(ProductError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_ttl_never_fails_a_write() {
        let h = harness_with(
            TtlPolicy::absolute_only(Duration::from_secs(u64::MAX)),
            CollectionPolicy::LazyExpiry,
        );

        let created = h.service.create_product(request("Forever")).await.unwrap();
        let updated = h
            .service
            .update_product(created.id, request("Forever 2"))
            .await
            .unwrap();

        assert!(h.cache.contains(&product_key(created.id)).await);
        assert_eq!(h.service.get_product(created.id).await.unwrap(), updated);
        assert_eq!(h.store.gets(), 0);
    }

    #[test]
    fn test_undecodable_value_is_serialization_error() {
        let result = decode::<Product>("{not json");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }

    #[test]
    fn test_collection_policy_from_str() {
        assert_eq!(
            "lazy".parse::<CollectionPolicy>().unwrap(),
            CollectionPolicy::LazyExpiry
        );
        assert_eq!(
            "INVALIDATE".parse::<CollectionPolicy>().unwrap(),
            CollectionPolicy::InvalidateOnWrite
        );
        assert!("eager".parse::<CollectionPolicy>().is_err());
    }
}
