//! In-memory source and gateway for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use saltline_core::{CartRequest, Product};

use crate::{CartGateway, CartSubmitError, CatalogError, CatalogSource};

/// A fixed product set serving as a [`CatalogSource`].
///
/// Counts fetches so cache tests can assert how many calls reached it.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
    /// collection handle -> member product handles
    collections: HashMap<String, Vec<String>>,
    fetches: AtomicUsize,
}

impl StaticCatalog {
    /// A catalog holding the given products and no collections.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products,
            collections: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Register a collection by member product handles.
    #[must_use]
    pub fn with_collection(mut self, handle: impl Into<String>, members: &[&str]) -> Self {
        self.collections.insert(
            handle.into(),
            members.iter().map(ToString::to_string).collect(),
        );
        self
    }

    /// Number of fetches that reached this source.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl CatalogSource for StaticCatalog {
    async fn product_by_handle(&self, handle: &str) -> Result<Product, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.products
            .iter()
            .find(|p| p.handle == handle)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(handle.to_string()))
    }

    async fn products_in_collection(
        &self,
        collection_handle: &str,
    ) -> Result<Vec<Product>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let members = self
            .collections
            .get(collection_handle)
            .ok_or_else(|| CatalogError::NotFound(collection_handle.to_string()))?;
        Ok(members
            .iter()
            .filter_map(|handle| self.products.iter().find(|p| &p.handle == handle))
            .cloned()
            .collect())
    }

    async fn products_by_ids(&self, ids: &[String]) -> Result<Vec<Product>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

/// A [`CartGateway`] that records every submitted request.
#[derive(Debug, Default)]
pub struct RecordingCartGateway {
    submitted: Mutex<Vec<CartRequest>>,
}

impl RecordingCartGateway {
    /// All requests submitted so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if a previous submission panicked while holding the lock.
    #[must_use]
    pub fn submitted(&self) -> Vec<CartRequest> {
        self.submitted.lock().expect("gateway lock poisoned").clone()
    }
}

impl CartGateway for RecordingCartGateway {
    async fn submit(&self, request: &CartRequest) -> Result<(), CartSubmitError> {
        self.submitted
            .lock()
            .map_err(|_| CartSubmitError::Upstream("gateway lock poisoned".to_string()))?
            .push(request.clone());
        Ok(())
    }
}
