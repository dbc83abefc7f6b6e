//! Cart request descriptors.
//!
//! The bundle engine never talks to the cart service itself; it produces
//! these descriptors and the storefront's cart collaborator executes them.

use serde::{Deserialize, Serialize};

/// One line to add to the remote cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineRequest {
    /// Product variant ID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: i64,
}

/// A complete add-to-cart request for a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartRequest {
    /// One line per bundle slot, in slot order.
    pub lines: Vec<CartLineRequest>,
    /// Discount code to attach, for code-mode bundles only. Automatic
    /// discounts apply server-side from cart contents and are omitted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_code_omitted_when_none() {
        let request = CartRequest {
            lines: vec![CartLineRequest {
                merchandise_id: "gid://shop/ProductVariant/1".to_string(),
                quantity: 1,
            }],
            discount_code: None,
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert!(json.get("discount_code").is_none());
    }

    #[test]
    fn test_discount_code_serialized_when_present() {
        let request = CartRequest {
            lines: vec![],
            discount_code: Some("BUNDLE10".to_string()),
        };
        let json = serde_json::to_value(&request).expect("serializes");
        assert_eq!(json["discount_code"], "BUNDLE10");
    }
}
