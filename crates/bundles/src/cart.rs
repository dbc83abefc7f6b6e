//! Translating a completed bundle instance into a cart request.
//!
//! This adapter never talks to the network; it returns a [`CartRequest`]
//! descriptor for the storefront's cart collaborator to execute.

use thiserror::Error;
use tracing::debug;

use saltline_core::{CartLineRequest, CartRequest};

use crate::definition::{BundleKind, DiscountMode};
use crate::selection::BundleInstance;

/// Why a bundle instance cannot be submitted to the cart. These surface as
/// user-facing card messages, never as page failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// One or more slots have no resolved variant yet. Shown as
    /// "Please select color and size for all N items".
    #[error("please select color and size for all {total} items ({missing} still unselected)")]
    IncompleteSelection { missing: usize, total: usize },

    /// A slot's resolved variant is not available for sale. Shown as
    /// "Out of Stock", distinct from the incomplete message.
    #[error("out of stock: slot {slot}")]
    OutOfStock { slot: usize },
}

/// Build the cart request for a fully selected bundle.
///
/// Each slot becomes one quantity-1 line, in slot order. Two slots resolving
/// to the identical variant stay two separate lines. The discount code is
/// attached only for code-mode bundles; automatic discounts apply
/// server-side from cart contents.
///
/// Gift slots must be resolved like any other slot, but their stock check is
/// skipped when the definition's `gift_slots_require_stock` is off.
///
/// # Errors
///
/// [`SubmitError::IncompleteSelection`] if any slot lacks a resolved
/// variant, else [`SubmitError::OutOfStock`] for the first unavailable one.
pub fn try_build_cart_request(instance: &BundleInstance) -> Result<CartRequest, SubmitError> {
    let total = instance.slots.len();
    let missing = instance.unresolved_count();
    if missing > 0 {
        return Err(SubmitError::IncompleteSelection { missing, total });
    }

    let gift_stock_exempt = matches!(
        instance.definition.kind,
        BundleKind::FreeGiftWithPurchase {
            gift_slots_require_stock: false,
            ..
        }
    );

    let mut lines = Vec::with_capacity(total);
    for (index, slot) in instance.slots.iter().enumerate() {
        // unresolved_count() == 0 guarantees every slot is resolved.
        let Some(resolved) = slot.resolved.as_ref() else {
            return Err(SubmitError::IncompleteSelection { missing: 1, total });
        };
        if !resolved.available_for_sale && !(slot.is_gift && gift_stock_exempt) {
            return Err(SubmitError::OutOfStock { slot: index });
        }
        lines.push(CartLineRequest {
            merchandise_id: resolved.variant_id.clone(),
            quantity: 1,
        });
    }

    let discount_code = match &instance.definition.discount {
        DiscountMode::Code { code } => Some(code.clone()),
        DiscountMode::Automatic => None,
    };

    debug!(
        bundle = %instance.definition.key,
        lines = lines.len(),
        has_code = discount_code.is_some(),
        "built cart request"
    );

    Ok(CartRequest {
        lines,
        discount_code,
    })
}
