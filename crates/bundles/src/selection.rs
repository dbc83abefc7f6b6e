//! Per-bundle-instance slot state.
//!
//! A [`BundleInstance`] is created when a product page mounts a bundle card,
//! mutates (by replacement - every transition returns a new instance) on each
//! user selection, and is discarded on unmount or successful checkout. It is
//! never persisted.
//!
//! Slot lifecycle: `Empty` → `PartiallySelected` → `Complete`, with
//! `OutOfStock` when a resolved variant exists but cannot be sold.
//! `OutOfStock` blocks submission but stays interactive; the user can pick a
//! different combination.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use saltline_core::{Money, Product, SelectedOption, Variant};

use crate::definition::{BundleDefinition, BundleKind};
use crate::resolver::{default_selections, resolve_variant};

/// Errors from misusing the selection API. Unresolvable color/size
/// combinations are not errors; they leave the slot `PartiallySelected`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Slot index past the bundle's slot count.
    #[error("slot index {index} out of range (bundle has {slot_count} slots)")]
    SlotOutOfRange { index: usize, slot_count: usize },

    /// The referenced product is not among the products supplied to the
    /// transition.
    #[error("product not available to this bundle: {handle}")]
    UnknownProduct { handle: String },
}

/// Which slot field a selection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    /// Swap the slot's product (value is a product handle).
    Product,
    /// Pick a color (value is an option value name).
    Color,
    /// Pick a size (value is an option value name).
    Size,
}

/// Derived state of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing chosen yet.
    Empty,
    /// Some options chosen but no variant resolves for the combination.
    PartiallySelected,
    /// A purchasable variant is resolved.
    Complete,
    /// A variant is resolved but is not available for sale.
    OutOfStock,
}

/// The variant a slot resolved to, denormalized with everything the pricing
/// and cart layers need so they never re-fetch the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedVariant {
    /// Variant ID (the cart merchandise ID).
    pub variant_id: String,
    /// Variant price at resolution time.
    pub price: Money,
    /// Whether the variant can currently be purchased.
    pub available_for_sale: bool,
    /// Variant image URL for the card thumbnail.
    pub image_url: Option<String>,
}

impl ResolvedVariant {
    fn from_variant(variant: &Variant) -> Self {
        Self {
            variant_id: variant.id.clone(),
            price: variant.price.clone(),
            available_for_sale: variant.available_for_sale,
            image_url: variant.image.as_ref().map(|img| img.url.clone()),
        }
    }
}

/// One selectable item position within a bundle instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Handle of the product currently in the slot.
    pub product_handle: String,
    /// Chosen color value, if any.
    pub chosen_color: Option<String>,
    /// Chosen size value, if any.
    pub chosen_size: Option<String>,
    /// Whether this is a gift slot of a free-gift bundle.
    pub is_gift: bool,
    /// The variant the current selection resolves to, if any.
    pub resolved: Option<ResolvedVariant>,
}

impl Slot {
    /// Derived state of this slot.
    #[must_use]
    pub fn state(&self) -> SlotState {
        match &self.resolved {
            Some(resolved) if resolved.available_for_sale => SlotState::Complete,
            Some(_) => SlotState::OutOfStock,
            None if self.chosen_color.is_none() && self.chosen_size.is_none() => SlotState::Empty,
            None => SlotState::PartiallySelected,
        }
    }
}

/// Runtime state of one bundle card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleInstance {
    /// The recipe this instance was created from.
    pub definition: BundleDefinition,
    /// Currency for display totals when nothing is resolved yet.
    pub currency_code: String,
    /// One slot per required item, paid slots first.
    pub slots: Vec<Slot>,
}

/// Seed a bundle instance from its definition and the products available to
/// it, before any user interaction.
///
/// Every paid slot defaults to the first eligible product with its default
/// color/size; fungible slots deliberately repeat the same product (the user
/// may also pick the same product twice - duplicates are allowed). Gift
/// slots are seeded from the definition's gift product.
///
/// Returns `None` when the catalog did not supply the products the bundle
/// needs (fetch failure or delisted product); callers skip the bundle card
/// rather than breaking the page.
#[must_use]
pub fn init_bundle_instance(
    definition: &BundleDefinition,
    available_products: &[Product],
) -> Option<BundleInstance> {
    let gift_handle = match &definition.kind {
        BundleKind::FreeGiftWithPurchase {
            gift_product_handle,
            ..
        } => Some(gift_product_handle.as_str()),
        _ => None,
    };

    let seed_product = available_products
        .iter()
        .find(|p| Some(p.handle.as_str()) != gift_handle)?;

    let mut slots = Vec::with_capacity(definition.kind.slot_count());
    for _ in 0..definition.kind.paid_slot_count() {
        slots.push(seed_slot(seed_product, false));
    }
    if let Some(gift_handle) = gift_handle {
        let gift_product = available_products
            .iter()
            .find(|p| p.handle == gift_handle)?;
        for _ in definition.kind.paid_slot_count()..definition.kind.slot_count() {
            slots.push(seed_slot(gift_product, true));
        }
    }

    let currency_code = seed_product
        .variants
        .first()
        .map_or_else(|| "USD".to_string(), |v| v.price.currency_code.clone());

    debug!(
        bundle = %definition.key,
        slots = slots.len(),
        seed = %seed_product.handle,
        "initialized bundle instance"
    );

    Some(BundleInstance {
        definition: definition.clone(),
        currency_code,
        slots,
    })
}

impl BundleInstance {
    /// Apply one user selection, returning the new instance.
    ///
    /// Only the targeted slot changes. A product swap resets that slot to
    /// the new product's default color/size; a color or size pick keeps the
    /// other axis and re-resolves. A combination with no matching variant
    /// leaves the slot `PartiallySelected` - that is state, not an error.
    ///
    /// Applying the same selection twice yields an identical instance.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] for an out-of-range slot index or a product
    /// handle missing from `products`.
    pub fn apply_selection(
        &self,
        products: &[Product],
        slot_index: usize,
        field: SelectionField,
        value: &str,
    ) -> Result<Self, SelectionError> {
        let mut next = self.clone();
        let slot = next
            .slots
            .get_mut(slot_index)
            .ok_or(SelectionError::SlotOutOfRange {
                index: slot_index,
                slot_count: self.slots.len(),
            })?;

        match field {
            SelectionField::Product => {
                let product = find_product(products, value)?;
                *slot = seed_slot(product, slot.is_gift);
            }
            SelectionField::Color => {
                slot.chosen_color = Some(value.to_string());
                let product = find_product(products, &slot.product_handle)?;
                slot.resolved = resolve_slot(product, slot);
            }
            SelectionField::Size => {
                slot.chosen_size = Some(value.to_string());
                let product = find_product(products, &slot.product_handle)?;
                slot.resolved = resolve_slot(product, slot);
            }
        }

        debug!(
            bundle = %next.definition.key,
            slot = slot_index,
            field = ?field,
            value,
            state = ?next.slots.get(slot_index).map(Slot::state),
            "applied selection"
        );

        Ok(next)
    }

    /// States of all slots, in slot order.
    #[must_use]
    pub fn slot_states(&self) -> Vec<SlotState> {
        self.slots.iter().map(Slot::state).collect()
    }

    /// Number of slots without a resolved variant.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.slots.iter().filter(|s| s.resolved.is_none()).count()
    }
}

fn find_product<'a>(
    products: &'a [Product],
    handle: &str,
) -> Result<&'a Product, SelectionError> {
    products
        .iter()
        .find(|p| p.handle == handle)
        .ok_or_else(|| SelectionError::UnknownProduct {
            handle: handle.to_string(),
        })
}

/// A fresh slot for `product` with its default selections resolved.
fn seed_slot(product: &Product, is_gift: bool) -> Slot {
    let defaults = default_selections(product);
    let mut slot = Slot {
        product_handle: product.handle.clone(),
        chosen_color: axis_value(&defaults, "Color"),
        chosen_size: axis_value(&defaults, "Size"),
        is_gift,
        resolved: None,
    };
    slot.resolved = resolve_slot(product, &slot);
    slot
}

fn axis_value(selections: &[SelectedOption], axis: &str) -> Option<String> {
    selections
        .iter()
        .find(|sel| sel.name.eq_ignore_ascii_case(axis))
        .map(|sel| sel.value.clone())
}

/// Resolve the slot's chosen color/size against its product.
///
/// Single-variant products resolve without input. Otherwise each color/size
/// axis the product declares must have a chosen value before resolution is
/// attempted; a color alone on a color+size product stays unresolved rather
/// than snapping to an arbitrary size.
fn resolve_slot(product: &Product, slot: &Slot) -> Option<ResolvedVariant> {
    if product.has_only_default_variant() {
        return resolve_variant(product, &[]).map(ResolvedVariant::from_variant);
    }

    let mut selections = Vec::with_capacity(2);
    for (axis, chosen) in [("Color", &slot.chosen_color), ("Size", &slot.chosen_size)] {
        let product_has_axis = product
            .options
            .iter()
            .any(|a| a.name.eq_ignore_ascii_case(axis));
        if product_has_axis {
            match chosen {
                Some(value) => selections.push(SelectedOption {
                    name: axis.to_string(),
                    value: value.clone(),
                }),
                None => return None,
            }
        }
    }

    if selections.is_empty() {
        return None;
    }

    resolve_variant(product, &selections).map(ResolvedVariant::from_variant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use saltline_core::{Image, OptionAxis, OptionValue};

    use crate::definition::{BundleRegistry, DiscountMode, Eligibility};

    fn usd(amount: &str) -> Money {
        Money::new(amount.parse::<Decimal>().expect("valid decimal"), "USD")
    }

    fn variant(id: &str, options: &[(&str, &str)], price: &str, available: bool) -> Variant {
        Variant {
            id: id.to_string(),
            selected_options: options
                .iter()
                .map(|(name, value)| SelectedOption {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
            price: usd(price),
            compare_at_price: None,
            available_for_sale: available,
            image: Some(Image {
                url: format!("https://cdn.example.com/{id}.jpg"),
                alt_text: None,
            }),
        }
    }

    fn axis(name: &str, values: &[&str]) -> OptionAxis {
        OptionAxis {
            name: name.to_string(),
            values: values.iter().map(|v| OptionValue::plain(*v)).collect(),
        }
    }

    fn polo_a() -> Product {
        Product {
            id: "gid://shop/Product/1".to_string(),
            handle: "polo-classic".to_string(),
            title: "Classic Polo".to_string(),
            options: vec![
                axis("Color", &["Red", "Black"]),
                axis("Size", &["M", "L"]),
            ],
            variants: vec![
                variant("a-red-m", &[("Color", "Red"), ("Size", "M")], "40.00", true),
                variant("a-red-l", &[("Color", "Red"), ("Size", "L")], "40.00", true),
                variant("a-black-m", &[("Color", "Black"), ("Size", "M")], "40.00", true),
                variant("a-black-l", &[("Color", "Black"), ("Size", "L")], "40.00", false),
            ],
        }
    }

    fn polo_b() -> Product {
        Product {
            id: "gid://shop/Product/2".to_string(),
            handle: "polo-pique".to_string(),
            title: "Pique Polo".to_string(),
            options: vec![
                axis("Color", &["White", "Navy"]),
                axis("Size", &["M", "L"]),
            ],
            variants: vec![
                variant("b-white-m", &[("Color", "White"), ("Size", "M")], "45.00", true),
                variant("b-white-l", &[("Color", "White"), ("Size", "L")], "45.00", true),
                variant("b-navy-m", &[("Color", "Navy"), ("Size", "M")], "45.00", false),
            ],
        }
    }

    fn products() -> Vec<Product> {
        vec![polo_a(), polo_b()]
    }

    fn polo_duo() -> BundleDefinition {
        BundleRegistry::builtin()
            .get("polo-duo")
            .expect("builtin")
            .clone()
    }

    fn two_slot_instance() -> BundleInstance {
        init_bundle_instance(&polo_duo(), &products()).expect("products available")
    }

    #[test]
    fn test_init_seeds_all_slots_with_first_product() {
        let instance = two_slot_instance();
        assert_eq!(instance.slots.len(), 2);
        for slot in &instance.slots {
            assert_eq!(slot.product_handle, "polo-classic");
            assert_eq!(slot.chosen_color.as_deref(), Some("Red"));
            assert_eq!(slot.chosen_size.as_deref(), Some("M"));
            assert_eq!(slot.state(), SlotState::Complete);
        }
        assert_eq!(instance.currency_code, "USD");
    }

    #[test]
    fn test_init_with_no_products_is_none() {
        assert!(init_bundle_instance(&polo_duo(), &[]).is_none());
    }

    #[test]
    fn test_select_color_keeps_size_and_reresolves() {
        let instance = two_slot_instance();
        let next = instance
            .apply_selection(&products(), 0, SelectionField::Color, "Black")
            .expect("valid selection");

        let slot = &next.slots[0];
        assert_eq!(slot.chosen_color.as_deref(), Some("Black"));
        assert_eq!(slot.chosen_size.as_deref(), Some("M"));
        assert_eq!(
            slot.resolved.as_ref().map(|r| r.variant_id.as_str()),
            Some("a-black-m")
        );
        // Slot 1 untouched.
        assert_eq!(next.slots[1], instance.slots[1]);
    }

    #[test]
    fn test_unresolvable_combination_is_partial_not_error() {
        let instance = two_slot_instance();
        let next = instance
            .apply_selection(&products(), 1, SelectionField::Product, "polo-pique")
            .expect("valid selection")
            .apply_selection(&products(), 1, SelectionField::Color, "Navy")
            .expect("valid selection")
            .apply_selection(&products(), 1, SelectionField::Size, "L")
            .expect("valid selection");

        // Navy/L was never produced.
        let slot = &next.slots[1];
        assert!(slot.resolved.is_none());
        assert_eq!(slot.state(), SlotState::PartiallySelected);
    }

    #[test]
    fn test_out_of_stock_state() {
        let instance = two_slot_instance();
        let next = instance
            .apply_selection(&products(), 0, SelectionField::Color, "Black")
            .expect("valid selection")
            .apply_selection(&products(), 0, SelectionField::Size, "L")
            .expect("valid selection");

        assert_eq!(next.slots[0].state(), SlotState::OutOfStock);
    }

    #[test]
    fn test_product_swap_resets_to_new_defaults() {
        let instance = two_slot_instance();
        // Polo B has no "Red": the slot must reset to B's first available
        // color, not carry Red over.
        let next = instance
            .apply_selection(&products(), 1, SelectionField::Product, "polo-pique")
            .expect("valid selection");

        let slot = &next.slots[1];
        assert_eq!(slot.product_handle, "polo-pique");
        assert_eq!(slot.chosen_color.as_deref(), Some("White"));
        assert_eq!(slot.chosen_size.as_deref(), Some("M"));
        assert_eq!(
            slot.resolved.as_ref().map(|r| r.variant_id.as_str()),
            Some("b-white-m")
        );
        // Other slot untouched.
        assert_eq!(next.slots[0], instance.slots[0]);
    }

    #[test]
    fn test_selection_is_idempotent() {
        let instance = two_slot_instance();
        let once = instance
            .apply_selection(&products(), 0, SelectionField::Color, "Black")
            .expect("valid selection");
        let twice = once
            .apply_selection(&products(), 0, SelectionField::Color, "Black")
            .expect("valid selection");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_slot_index_out_of_range() {
        let instance = two_slot_instance();
        let err = instance
            .apply_selection(&products(), 5, SelectionField::Color, "Black")
            .expect_err("index past slot count");
        assert_eq!(
            err,
            SelectionError::SlotOutOfRange {
                index: 5,
                slot_count: 2
            }
        );
    }

    #[test]
    fn test_unknown_product_swap() {
        let instance = two_slot_instance();
        let err = instance
            .apply_selection(&products(), 0, SelectionField::Product, "gone")
            .expect_err("unknown handle");
        assert_eq!(
            err,
            SelectionError::UnknownProduct {
                handle: "gone".to_string()
            }
        );
    }

    #[test]
    fn test_gift_bundle_seeds_gift_slots() {
        let registry = BundleRegistry::builtin();
        let definition = registry.get("tops-free-cap").expect("builtin");

        let cap = Product {
            id: "gid://shop/Product/9".to_string(),
            handle: "boat-cap".to_string(),
            title: "Boat Cap".to_string(),
            options: vec![axis("Title", &["Default Title"])],
            variants: vec![variant(
                "cap-v1",
                &[("Title", "Default Title")],
                "25.00",
                true,
            )],
        };
        let mut available = products();
        available.push(cap);

        let instance = init_bundle_instance(definition, &available).expect("products available");
        assert_eq!(instance.slots.len(), 5);
        assert!(!instance.slots[3].is_gift);
        assert!(instance.slots[4].is_gift);
        assert_eq!(instance.slots[4].product_handle, "boat-cap");
        // The no-option cap resolves without any color/size input.
        assert_eq!(instance.slots[4].state(), SlotState::Complete);
    }

    #[test]
    fn test_gift_bundle_without_gift_product_is_none() {
        let registry = BundleRegistry::builtin();
        let definition = registry.get("tops-free-cap").expect("builtin");
        assert!(init_bundle_instance(definition, &products()).is_none());
    }

    #[test]
    fn test_duplicate_products_allowed_across_slots() {
        let instance = two_slot_instance();
        // Both slots already hold the same product/variant; that is accepted
        // and later yields two separate cart lines.
        let ids: Vec<_> = instance
            .slots
            .iter()
            .filter_map(|s| s.resolved.as_ref().map(|r| r.variant_id.clone()))
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], ids[1]);
    }

    #[test]
    fn test_definition_defaults() {
        let definition = BundleDefinition {
            key: "x".to_string(),
            kind: BundleKind::CrossSell { slot_count: 2 },
            title: String::new(),
            description: String::new(),
            discount_percent: Some(Decimal::TEN),
            discount: DiscountMode::Automatic,
            eligibility: Eligibility {
                by_product_handle: vec!["polo-classic".to_string()],
                by_collection: Vec::new(),
            },
        };
        let instance =
            init_bundle_instance(&definition, &products()).expect("products available");
        assert_eq!(instance.slot_states(), vec![SlotState::Complete; 2]);
        assert_eq!(instance.unresolved_count(), 0);
    }
}
