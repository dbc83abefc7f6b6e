//! Saltline bundle engine.
//!
//! Everything needed to drive a promotional bundle card, consolidated behind
//! one testable API instead of being re-implemented per card:
//!
//! - [`definition`] - declarative bundle recipes and the registry that
//!   answers "which bundles apply to this product?"
//! - [`resolver`] - mapping (color, size) selections to a concrete variant
//! - [`selection`] - the per-bundle-instance slot state machine
//! - [`pricing`] - original vs. discounted totals per bundle kind
//! - [`cart`] - translating a completed instance into a cart request
//!
//! # Architecture
//!
//! The engine is synchronous and pure: every operation takes immutable
//! snapshots and returns new values, so the UI layer can re-render from any
//! state without locking. Catalog fetches and cart mutations live behind the
//! `saltline-catalog` traits; nothing here performs I/O.
//!
//! # Example
//!
//! ```rust,ignore
//! use saltline_bundles::{BundleRegistry, SelectionField};
//!
//! let registry = BundleRegistry::builtin();
//! let bundles = registry.eligible_for("polo-classic", &["polos".to_string()]);
//!
//! let instance = saltline_bundles::init_bundle_instance(bundles[0], &products)
//!     .expect("products available");
//! let instance = instance.apply_selection(&products, 0, SelectionField::Color, "Black")?;
//!
//! let price = saltline_bundles::display_price(&instance)?;
//! let request = saltline_bundles::try_build_cart_request(&instance)?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod definition;
pub mod pricing;
pub mod resolver;
pub mod selection;

pub use cart::{SubmitError, try_build_cart_request};
pub use definition::{
    BundleDefinition, BundleKind, BundleRegistry, DiscountMode, Eligibility, RegistryError,
};
pub use pricing::{BundlePrice, compute_bundle_price, compute_free_gift_price, display_price};
pub use resolver::{default_selections, resolve_variant};
pub use selection::{
    BundleInstance, ResolvedVariant, SelectionError, SelectionField, Slot, SlotState,
    init_bundle_instance,
};
