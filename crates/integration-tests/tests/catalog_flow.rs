//! Catalog boundary flows: normalization, caching, and cart submission.

use std::time::Duration;

use saltline_bundles::{BundleRegistry, init_bundle_instance, try_build_cart_request};
use saltline_catalog::raw::{RawProduct, normalize_products};
use saltline_catalog::{CachedCatalog, CartGateway, RecordingCartGateway, StaticCatalog};
use saltline_integration_tests::{polo_classic, polo_pique};

// =============================================================================
// Normalization at the boundary
// =============================================================================

#[test]
fn test_loose_payload_normalizes_into_engine_ready_products() {
    let payload = serde_json::json!([
        {
            "id": "gid://shop/Product/1",
            "handle": "polo-classic",
            "title": "Classic Polo",
            "options": [
                { "name": "Color", "values": ["Black"] },
                { "name": "Size", "values": ["M", "L"] }
            ],
            "variants": [
                {
                    "id": "pc-black-m",
                    "selectedOptions": [
                        { "name": "Color", "value": "Black" },
                        { "name": "Size", "value": "M" }
                    ],
                    "price": { "amount": "40.00", "currencyCode": "USD" },
                    "availableForSale": true
                },
                {
                    "id": "pc-black-l",
                    "selectedOptions": [
                        { "name": "Color", "value": "Black" },
                        { "name": "Size", "value": "L" }
                    ],
                    "price": { "amount": "40.00", "currencyCode": "USD" },
                    "availableForSale": true
                }
            ]
        },
        // Broken entry: no variants. Dropped, not fatal.
        { "id": "gid://shop/Product/999", "handle": "ghost", "title": "Ghost" }
    ]);

    let raw: Vec<RawProduct> = serde_json::from_value(payload).expect("parses");
    let products = normalize_products(raw);
    assert_eq!(products.len(), 1);

    // The normalized product drives the engine directly.
    let registry = BundleRegistry::builtin();
    let duo = registry.get("polo-duo").expect("builtin");
    let instance = init_bundle_instance(duo, &products).expect("seeds from normalized data");
    assert!(try_build_cart_request(&instance).is_ok());
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_page_view_fetches_each_resource_once() {
    let source = StaticCatalog::new(vec![polo_classic(), polo_pique()])
        .with_collection("polos", &["polo-classic", "polo-pique"]);
    let catalog = CachedCatalog::with_policy(source, Duration::from_secs(300), 100);

    // Several bundle cards on one page ask for the same collection.
    for _ in 0..3 {
        let products = catalog
            .products_in_collection("polos")
            .await
            .expect("collection exists");
        assert_eq!(products.len(), 2);
    }
    assert_eq!(catalog.source_ref().fetch_count(), 1);
}

// =============================================================================
// Cart submission
// =============================================================================

#[tokio::test]
async fn test_cart_request_reaches_gateway() {
    let products = vec![polo_classic()];
    let registry = BundleRegistry::builtin();
    let duo = registry.get("polo-duo").expect("builtin");

    let instance = init_bundle_instance(duo, &products).expect("products available");
    let request = try_build_cart_request(&instance).expect("complete");

    let gateway = RecordingCartGateway::default();
    gateway.submit(&request).await.expect("accepted");

    let submitted = gateway.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].lines.len(), 2);
}
