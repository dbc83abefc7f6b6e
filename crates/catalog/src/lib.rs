//! Saltline catalog access boundary.
//!
//! The bundle engine treats the remote product catalog and cart service as
//! opaque collaborators. This crate owns that seam:
//!
//! - [`CatalogSource`] / [`CartGateway`] - the traits a transport
//!   implementation (GraphQL client, fixture set) fulfils
//! - [`raw`] - loose upstream payload shapes, normalized and validated into
//!   the strict `saltline-core` records before anything downstream sees them
//! - [`cache`] - a bounded, TTL'd read-through cache over any source
//! - [`memory`] - in-memory source and gateway for tests and local dev
//!
//! # Architecture
//!
//! The upstream API is the source of truth - no local sync, direct calls,
//! with responses cached in-memory via `moka` (5 minute TTL). Malformed
//! upstream data is rejected or dropped here with a warning; a missing or
//! broken product never propagates into the pricing engine (a bundle card
//! that cannot load is skipped, not a page error).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod memory;
pub mod raw;

pub use cache::CachedCatalog;
pub use memory::{RecordingCartGateway, StaticCatalog};

use saltline_core::{CartRequest, Product, ProductError};
use thiserror::Error;

/// Errors from catalog access.
///
/// Callers degrade gracefully on any of these: a bundle section that cannot
/// fetch its products is omitted from the page.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product or collection with the requested handle.
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream payload was structurally unusable for this handle.
    #[error("malformed product '{handle}': {reason}")]
    Malformed { handle: String, reason: String },

    /// A normalized product failed the domain invariants.
    #[error("invalid product data: {0}")]
    Invalid(#[from] ProductError),

    /// Transport or service failure from the upstream API.
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Errors from submitting a cart request.
#[derive(Debug, Error)]
pub enum CartSubmitError {
    /// The cart service rejected the request (bad variant, expired code).
    #[error("cart request rejected: {0}")]
    Rejected(String),

    /// Transport or service failure.
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// Read access to the product catalog.
///
/// Implementations own transport, authentication, and retries; callers own
/// caching via [`CachedCatalog`].
pub trait CatalogSource {
    /// Fetch a single product by its handle.
    fn product_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<Product, CatalogError>> + Send;

    /// Fetch the products in a collection, in the collection's order.
    fn products_in_collection(
        &self,
        collection_handle: &str,
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;

    /// Fetch products by ID. Unknown IDs are skipped, not errors.
    fn products_by_ids(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<Product>, CatalogError>> + Send;
}

/// Write access to the remote cart.
pub trait CartGateway {
    /// Execute an add-to-cart request built by the bundle engine.
    fn submit(
        &self,
        request: &CartRequest,
    ) -> impl Future<Output = Result<(), CartSubmitError>> + Send;
}
