//! Bounded read-through cache over a catalog source.
//!
//! Product data changes rarely within a page view; the cache keeps repeat
//! bundle cards from re-fetching the same product. Capacity and TTL are
//! explicit so a long-lived process cannot grow without bound.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use saltline_core::Product;

use crate::{CatalogError, CatalogSource};

/// Default time-to-live for cached catalog responses.
const DEFAULT_TTL: Duration = Duration::from_secs(300); // 5 minutes
/// Default maximum number of cached entries.
const DEFAULT_CAPACITY: u64 = 1000;

/// Cache key for catalog lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Product(String),
    Collection(String),
    ProductsByIds(Vec<String>),
}

/// Cached value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// A [`CatalogSource`] wrapper that caches responses.
///
/// Errors are never cached; a failed fetch is retried on the next call.
pub struct CachedCatalog<S> {
    source: S,
    cache: Cache<CacheKey, CacheValue>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    /// Wrap a source with the default policy (5-minute TTL, 1000 entries).
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_policy(source, DEFAULT_TTL, DEFAULT_CAPACITY)
    }

    /// Wrap a source with an explicit TTL and capacity.
    #[must_use]
    pub fn with_policy(source: S, ttl: Duration, capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self { source, cache }
    }

    /// Get a product by handle, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying source on a miss.
    #[instrument(skip(self), fields(handle = %handle))]
    pub async fn product_by_handle(&self, handle: &str) -> Result<Product, CatalogError> {
        let key = CacheKey::Product(handle.to_string());
        if let Some(CacheValue::Product(product)) = self.cache.get(&key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let product = self.source.product_by_handle(handle).await?;
        self.cache
            .insert(key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// Get a collection's products, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying source on a miss.
    #[instrument(skip(self), fields(collection = %collection_handle))]
    pub async fn products_in_collection(
        &self,
        collection_handle: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::Collection(collection_handle.to_string());
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            debug!("cache hit for collection");
            return Ok(products);
        }

        let products = self.source.products_in_collection(collection_handle).await?;
        self.cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get products by ID, from cache when fresh.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the underlying source on a miss.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogError> {
        let key = CacheKey::ProductsByIds(ids.to_vec());
        if let Some(CacheValue::Products(products)) = self.cache.get(&key).await {
            debug!("cache hit for products by ids");
            return Ok(products);
        }

        let products = self.source.products_by_ids(ids).await?;
        self.cache
            .insert(key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// The wrapped source.
    #[must_use]
    pub const fn source_ref(&self) -> &S {
        &self.source
    }

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, handle: &str) {
        self.cache
            .invalidate(&CacheKey::Product(handle.to_string()))
            .await;
    }

    /// Invalidate a cached collection.
    pub async fn invalidate_collection(&self, handle: &str) {
        self.cache
            .invalidate(&CacheKey::Collection(handle.to_string()))
            .await;
    }

    /// Invalidate all cached data.
    pub async fn invalidate_all(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }
}

impl<S: CatalogSource + Sync> CatalogSource for CachedCatalog<S> {
    async fn product_by_handle(&self, handle: &str) -> Result<Product, CatalogError> {
        Self::product_by_handle(self, handle).await
    }

    async fn products_in_collection(
        &self,
        collection_handle: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        Self::products_in_collection(self, collection_handle).await
    }

    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogError> {
        Self::products_by_ids(self, ids).await
    }
}
