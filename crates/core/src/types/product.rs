//! Normalized product, option, and variant records.
//!
//! These are the strict shapes the bundle engine operates on. Upstream
//! catalog payloads are loose; the catalog crate normalizes them into these
//! records and validates the invariants with [`Product::validate`] before
//! anything downstream sees them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::money::Money;

/// Violations of the product/variant invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// A variant assigns a different number of options than the product
    /// declares axes.
    #[error("variant {variant_id}: expected {expected} selected options, got {got}")]
    OptionCountMismatch {
        variant_id: String,
        expected: usize,
        got: usize,
    },

    /// A variant does not assign a value for a declared option axis.
    #[error("variant {variant_id}: no value for option axis '{axis}'")]
    MissingAxisValue { variant_id: String, axis: String },

    /// Two variants share an identical option assignment.
    #[error("variant {variant_id} duplicates the options of variant {duplicate_of}")]
    DuplicateVariant {
        variant_id: String,
        duplicate_of: String,
    },
}

/// One (axis, value) assignment on a variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option axis name (e.g., "Color", "Size").
    pub name: String,
    /// Assigned value (e.g., "Black", "M").
    pub value: String,
}

/// A selectable value on an option axis.
///
/// The swatch fields are presentation hints for the UI and carry no pricing
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    /// Value name (e.g., "Seafoam").
    pub name: String,
    /// CSS color for a swatch, if the store configured one.
    pub swatch_color: Option<String>,
    /// Swatch image URL, if the store configured one.
    pub swatch_image_url: Option<String>,
}

impl OptionValue {
    /// A value with no swatch hints.
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            swatch_color: None,
            swatch_image_url: None,
        }
    }
}

/// A product attribute users choose between (e.g., Color, Size).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionAxis {
    /// Axis name. Matched case-insensitively throughout the engine.
    pub name: String,
    /// Declared values in display order.
    pub values: Vec<OptionValue>,
}

/// Product or variant image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

/// A specific purchasable SKU of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Variant ID (the merchandise ID used in cart lines).
    pub id: String,
    /// Exactly one value per product option axis.
    pub selected_options: Vec<SelectedOption>,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Whether this variant can currently be purchased.
    pub available_for_sale: bool,
    /// Variant image.
    pub image: Option<Image>,
}

impl Variant {
    /// The value this variant assigns to the given axis, matched
    /// case-insensitively on the axis name.
    #[must_use]
    pub fn option_value(&self, axis: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|opt| opt.name.eq_ignore_ascii_case(axis))
            .map(|opt| opt.value.as_str())
    }
}

/// A product with its option axes and variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque unique identifier.
    pub id: String,
    /// Unique human-readable slug.
    pub handle: String,
    /// Display title.
    pub title: String,
    /// Option axes in display order. Empty for single-variant products.
    pub options: Vec<OptionAxis>,
    /// Variants in the store's declared order.
    pub variants: Vec<Variant>,
}

impl Product {
    /// Whether the product has exactly one variant and no meaningful options.
    ///
    /// Such products (a one-size cap, say) are purchasable without any
    /// color/size input.
    #[must_use]
    pub fn has_only_default_variant(&self) -> bool {
        self.variants.len() == 1 && self.options.iter().all(|axis| axis.values.len() <= 1)
    }

    /// Validate the variant/option invariants.
    ///
    /// Every variant must assign exactly one value per declared option axis,
    /// and no two variants may share an identical assignment.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ProductError> {
        for variant in &self.variants {
            if variant.selected_options.len() != self.options.len() {
                return Err(ProductError::OptionCountMismatch {
                    variant_id: variant.id.clone(),
                    expected: self.options.len(),
                    got: variant.selected_options.len(),
                });
            }
            for axis in &self.options {
                if variant.option_value(&axis.name).is_none() {
                    return Err(ProductError::MissingAxisValue {
                        variant_id: variant.id.clone(),
                        axis: axis.name.clone(),
                    });
                }
            }
        }

        // Pairwise duplicate check; variant counts are small (tens).
        for (i, variant) in self.variants.iter().enumerate() {
            for earlier in self.variants.iter().take(i) {
                if same_option_assignment(variant, earlier) {
                    return Err(ProductError::DuplicateVariant {
                        variant_id: variant.id.clone(),
                        duplicate_of: earlier.id.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Whether two variants assign the same value to every axis, ignoring
/// axis-name case and option order.
fn same_option_assignment(a: &Variant, b: &Variant) -> bool {
    a.selected_options.len() == b.selected_options.len()
        && a.selected_options
            .iter()
            .all(|opt| b.option_value(&opt.name) == Some(opt.value.as_str()))
}

/// A collection of products, referenced by handle in bundle eligibility
/// rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// URL handle.
    pub handle: String,
    /// Display title.
    pub title: String,
}
