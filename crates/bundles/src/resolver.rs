//! Variant resolution: mapping option selections to a purchasable SKU.

use saltline_core::{Product, SelectedOption, Variant};

/// Find the variant matching the given option selections.
///
/// Axis names match case-insensitively; values match exactly. Every given
/// pair must hold, so callers should supply at most one value per axis
/// (conflicting pairs simply match nothing).
///
/// With no selections, a product with exactly one variant resolves to that
/// sole variant; one-size items like caps are purchasable without any
/// color/size input. Multi-variant products need selections.
///
/// Returns `None` when no variant matches; that is ordinary state (the
/// combination does not exist), not an error.
#[must_use]
pub fn resolve_variant<'a>(
    product: &'a Product,
    selections: &[SelectedOption],
) -> Option<&'a Variant> {
    if selections.is_empty() {
        return match product.variants.as_slice() {
            [sole] => Some(sole),
            _ => None,
        };
    }

    product.variants.iter().find(|variant| {
        selections
            .iter()
            .all(|sel| variant.option_value(&sel.name) == Some(sel.value.as_str()))
    })
}

/// The default option selections for a product: the first variant in list
/// order that is available for sale, else the first declared value on each
/// axis.
///
/// Used to seed bundle slots before any user interaction and to reset a slot
/// when its product is swapped.
#[must_use]
pub fn default_selections(product: &Product) -> Vec<SelectedOption> {
    if let Some(variant) = product.variants.iter().find(|v| v.available_for_sale) {
        return variant.selected_options.clone();
    }

    product
        .options
        .iter()
        .filter_map(|axis| {
            axis.values.first().map(|value| SelectedOption {
                name: axis.name.clone(),
                value: value.name.clone(),
            })
        })
        .collect()
}
