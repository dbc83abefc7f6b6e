//! Declarative bundle recipes and the registry that holds them.
//!
//! A [`BundleDefinition`] describes one promotional offer: how many slots it
//! has, how the discount is computed and applied, and which products surface
//! it. Definitions are loaded once (built-in or from JSON config) and are
//! immutable at runtime. The [`BundleRegistry`] preserves declaration order,
//! which is also the display order on product pages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a bundle registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registry JSON could not be parsed.
    #[error("invalid registry JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two definitions share a key.
    #[error("duplicate bundle key: {0}")]
    DuplicateKey(String),

    /// A definition fails a structural check.
    #[error("invalid bundle '{key}': {reason}")]
    InvalidDefinition { key: String, reason: String },
}

/// The shape of a bundle offer and its kind-specific rules.
///
/// The storefront's cards used to dispatch on a free-form `type` string; the
/// kinds are a closed set, so they are a tagged enum here and the selection
/// and pricing logic is shared across all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BundleKind {
    /// N fungible slots from the eligible products, uniform percent off
    /// (e.g., "any 2 polos, 10% off").
    FixedSlotDiscount { slot_count: usize },

    /// Paired slots across complementary products (e.g., polo + shorts),
    /// uniform percent off.
    CrossSell { slot_count: usize },

    /// Buy N qualifying items, get the gift item free. The gift costs
    /// nothing; paid slots are full price.
    FreeGiftWithPurchase {
        /// Number of paid slots required to qualify.
        paid_quantity: usize,
        /// Number of gift slots added on top.
        free_quantity: usize,
        /// Handle of the product placed in the gift slots.
        gift_product_handle: String,
        /// Whether gift slots must be in stock to check out. The legacy
        /// storefront skipped this check for its free cap; that is now a
        /// per-recipe setting instead of a hard-coded handle.
        #[serde(default = "default_true")]
        gift_slots_require_stock: bool,
    },

    /// The linen shop's shirt + trouser pairing. Same mechanics as
    /// [`BundleKind::CrossSell`]; kept distinct because merchandising styles
    /// and reports it separately.
    LinenCrossSell { slot_count: usize },
}

const fn default_true() -> bool {
    true
}

impl BundleKind {
    /// Total number of slots an instance of this bundle has.
    #[must_use]
    pub const fn slot_count(&self) -> usize {
        match self {
            Self::FixedSlotDiscount { slot_count }
            | Self::CrossSell { slot_count }
            | Self::LinenCrossSell { slot_count } => *slot_count,
            Self::FreeGiftWithPurchase {
                paid_quantity,
                free_quantity,
                ..
            } => *paid_quantity + *free_quantity,
        }
    }

    /// Number of paid (non-gift) slots.
    #[must_use]
    pub const fn paid_slot_count(&self) -> usize {
        match self {
            Self::FreeGiftWithPurchase { paid_quantity, .. } => *paid_quantity,
            _ => self.slot_count(),
        }
    }

    /// Whether the slot at `index` is a gift slot.
    #[must_use]
    pub const fn is_gift_slot(&self, index: usize) -> bool {
        index >= self.paid_slot_count()
    }
}

/// How a bundle's discount reaches the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiscountMode {
    /// Applied server-side from cart contents; nothing to attach.
    Automatic,
    /// Requires an explicit code attached to the cart.
    Code { code: String },
}

/// Rules determining which products surface a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Eligibility {
    /// Product handles that surface the bundle directly.
    #[serde(default)]
    pub by_product_handle: Vec<String>,
    /// Collection handles; membership in any of them surfaces the bundle.
    #[serde(default)]
    pub by_collection: Vec<String>,
}

impl Eligibility {
    /// Whether a product with this handle and collection membership matches.
    #[must_use]
    pub fn matches(&self, product_handle: &str, collection_handles: &[String]) -> bool {
        self.by_product_handle.iter().any(|h| h == product_handle)
            || self
                .by_collection
                .iter()
                .any(|c| collection_handles.iter().any(|m| m == c))
    }
}

/// One declarative bundle recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDefinition {
    /// Unique key, used for dedup and analytics.
    pub key: String,
    /// Slot shape and kind-specific rules.
    #[serde(flatten)]
    pub kind: BundleKind,
    /// Card title (e.g., "2 Polos Bundle").
    pub title: String,
    /// Card description.
    pub description: String,
    /// Uniform percent off across slots. Ignored for
    /// [`BundleKind::FreeGiftWithPurchase`], where the discount is the gift
    /// itself.
    #[serde(default)]
    pub discount_percent: Option<Decimal>,
    /// How the discount is applied at checkout.
    pub discount: DiscountMode,
    /// Which products surface this bundle.
    pub eligibility: Eligibility,
}

impl BundleDefinition {
    /// The uniform discount percentage, zero when none applies.
    #[must_use]
    pub fn discount_percent(&self) -> Decimal {
        match self.kind {
            // The gift is the discount; paid slots are full price.
            BundleKind::FreeGiftWithPurchase { .. } => Decimal::ZERO,
            _ => self.discount_percent.unwrap_or(Decimal::ZERO),
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: &str| RegistryError::InvalidDefinition {
            key: self.key.clone(),
            reason: reason.to_string(),
        };

        if self.kind.slot_count() == 0 {
            return Err(invalid("bundle has zero slots"));
        }
        if let BundleKind::FreeGiftWithPurchase {
            paid_quantity,
            free_quantity,
            ref gift_product_handle,
            ..
        } = self.kind
        {
            if paid_quantity == 0 || free_quantity == 0 {
                return Err(invalid("gift bundle needs paid and free quantities"));
            }
            if gift_product_handle.is_empty() {
                return Err(invalid("gift bundle needs a gift product handle"));
            }
        }
        if let Some(percent) = self.discount_percent {
            if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
                return Err(invalid("discount percent must be within 0..=100"));
            }
        }
        if self.eligibility.by_product_handle.is_empty() && self.eligibility.by_collection.is_empty()
        {
            return Err(invalid("bundle has no eligibility rules"));
        }
        Ok(())
    }
}

/// Ordered, immutable catalog of bundle recipes.
#[derive(Debug, Clone)]
pub struct BundleRegistry {
    definitions: Vec<BundleDefinition>,
}

impl BundleRegistry {
    /// Build a registry from definitions, validating each and rejecting
    /// duplicate keys. Declaration order is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] for the first invalid or duplicated
    /// definition.
    pub fn new(definitions: Vec<BundleDefinition>) -> Result<Self, RegistryError> {
        let mut seen = std::collections::HashSet::new();
        for definition in &definitions {
            definition.validate()?;
            if !seen.insert(definition.key.clone()) {
                return Err(RegistryError::DuplicateKey(definition.key.clone()));
            }
        }
        Ok(Self { definitions })
    }

    /// Load a registry from JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the JSON is malformed or a definition
    /// fails validation.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let definitions: Vec<BundleDefinition> = serde_json::from_str(json)?;
        Self::new(definitions)
    }

    /// The store's built-in recipes.
    ///
    /// # Panics
    ///
    /// Panics if the built-in definitions are invalid, which is a programming
    /// error covered by tests.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(builtin_definitions()).expect("built-in bundle definitions are valid")
    }

    /// Look up a definition by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BundleDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    /// All definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &BundleDefinition> {
        self.definitions.iter()
    }

    /// The bundles a product surfaces, in declaration order.
    ///
    /// A bundle matches if the product handle is listed directly or any of
    /// the product's collections is listed. A bundle matched by both rules
    /// appears once. Most products match nothing and get an empty list.
    #[must_use]
    pub fn eligible_for(
        &self,
        product_handle: &str,
        collection_handles: &[String],
    ) -> Vec<&BundleDefinition> {
        let mut seen = std::collections::HashSet::new();
        self.definitions
            .iter()
            .filter(|d| d.eligibility.matches(product_handle, collection_handles))
            .filter(|d| seen.insert(d.key.as_str()))
            .collect()
    }
}

/// The live recipes, mirrored from merchandising's promotion calendar.
fn builtin_definitions() -> Vec<BundleDefinition> {
    fn percent(value: u32) -> Option<Decimal> {
        Some(Decimal::from(value))
    }

    vec![
        BundleDefinition {
            key: "polo-duo".to_string(),
            kind: BundleKind::FixedSlotDiscount { slot_count: 2 },
            title: "2 Polos Bundle".to_string(),
            description: "Pick any two polos and save 10%.".to_string(),
            discount_percent: percent(10),
            discount: DiscountMode::Automatic,
            eligibility: Eligibility {
                by_product_handle: Vec::new(),
                by_collection: vec!["polos".to_string()],
            },
        },
        BundleDefinition {
            key: "tee-trio".to_string(),
            kind: BundleKind::FixedSlotDiscount { slot_count: 3 },
            title: "Tee Trio".to_string(),
            description: "Any three tees, 15% off.".to_string(),
            discount_percent: percent(15),
            discount: DiscountMode::Code {
                code: "TRIO15".to_string(),
            },
            eligibility: Eligibility {
                by_product_handle: Vec::new(),
                by_collection: vec!["tees".to_string()],
            },
        },
        BundleDefinition {
            key: "polo-shorts-pair".to_string(),
            kind: BundleKind::CrossSell { slot_count: 2 },
            title: "Polo + Shorts".to_string(),
            description: "Complete the look: add shorts and save 10%.".to_string(),
            discount_percent: percent(10),
            discount: DiscountMode::Automatic,
            eligibility: Eligibility {
                by_product_handle: vec![
                    "polo-classic".to_string(),
                    "polo-pique".to_string(),
                    "shorts-deck".to_string(),
                ],
                by_collection: Vec::new(),
            },
        },
        BundleDefinition {
            key: "tops-free-cap".to_string(),
            kind: BundleKind::FreeGiftWithPurchase {
                paid_quantity: 4,
                free_quantity: 1,
                gift_product_handle: "boat-cap".to_string(),
                // The cap ships regardless of its own stock flag; see
                // DESIGN.md for the business-rule decision.
                gift_slots_require_stock: false,
            },
            title: "4 Tops, Free Cap".to_string(),
            description: "Buy any four tops and the boat cap is on us.".to_string(),
            discount_percent: None,
            discount: DiscountMode::Automatic,
            eligibility: Eligibility {
                by_product_handle: Vec::new(),
                by_collection: vec!["tops".to_string()],
            },
        },
        BundleDefinition {
            key: "linen-set".to_string(),
            kind: BundleKind::LinenCrossSell { slot_count: 2 },
            title: "Linen Set".to_string(),
            description: "Shirt and trousers together, 15% off.".to_string(),
            discount_percent: percent(15),
            discount: DiscountMode::Code {
                code: "LINENSET".to_string(),
            },
            eligibility: Eligibility {
                by_product_handle: Vec::new(),
                by_collection: vec!["linen".to_string()],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle_only(key: &str, handles: &[&str]) -> BundleDefinition {
        BundleDefinition {
            key: key.to_string(),
            kind: BundleKind::FixedSlotDiscount { slot_count: 2 },
            title: key.to_string(),
            description: String::new(),
            discount_percent: Some(Decimal::TEN),
            discount: DiscountMode::Automatic,
            eligibility: Eligibility {
                by_product_handle: handles.iter().map(ToString::to_string).collect(),
                by_collection: Vec::new(),
            },
        }
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = BundleRegistry::builtin();
        assert!(registry.iter().count() >= 5);
        assert!(registry.get("polo-duo").is_some());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = BundleRegistry::new(vec![
            handle_only("dup", &["a"]),
            handle_only("dup", &["b"]),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateKey(key)) if key == "dup"));
    }

    #[test]
    fn test_zero_slots_rejected() {
        let mut definition = handle_only("zero", &["a"]);
        definition.kind = BundleKind::FixedSlotDiscount { slot_count: 0 };
        let result = BundleRegistry::new(vec![definition]);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidDefinition { key, .. }) if key == "zero"
        ));
    }

    #[test]
    fn test_no_eligibility_rejected() {
        let mut definition = handle_only("orphan", &[]);
        definition.eligibility = Eligibility::default();
        assert!(BundleRegistry::new(vec![definition]).is_err());
    }

    #[test]
    fn test_eligible_for_product_handle() {
        let registry = BundleRegistry::builtin();
        let bundles = registry.eligible_for("polo-classic", &[]);
        assert_eq!(bundles.len(), 1);
        assert_eq!(bundles[0].key, "polo-shorts-pair");
    }

    #[test]
    fn test_eligible_for_collection() {
        let registry = BundleRegistry::builtin();
        let collections = vec!["polos".to_string(), "tops".to_string()];
        let keys: Vec<_> = registry
            .eligible_for("polo-pique", &collections)
            .iter()
            .map(|d| d.key.as_str())
            .collect();
        // Declaration order: polo-duo before polo-shorts-pair before the cap.
        assert_eq!(keys, vec!["polo-duo", "polo-shorts-pair", "tops-free-cap"]);
    }

    #[test]
    fn test_eligible_for_dedups_double_match() {
        let registry = BundleRegistry::new(vec![BundleDefinition {
            eligibility: Eligibility {
                by_product_handle: vec!["polo-classic".to_string()],
                by_collection: vec!["polos".to_string()],
            },
            ..handle_only("both", &[])
        }])
        .expect("valid registry");

        let bundles = registry.eligible_for("polo-classic", &["polos".to_string()]);
        assert_eq!(bundles.len(), 1);
    }

    #[test]
    fn test_eligible_for_no_match() {
        let registry = BundleRegistry::builtin();
        assert!(registry.eligible_for("gift-card", &[]).is_empty());
    }

    #[test]
    fn test_gift_kind_discount_percent_is_zero() {
        let registry = BundleRegistry::builtin();
        let cap = registry.get("tops-free-cap").expect("builtin");
        assert_eq!(cap.discount_percent(), Decimal::ZERO);
    }

    #[test]
    fn test_from_json_round_trip() {
        let json = r#"[
            {
                "key": "polo-duo",
                "kind": "fixed_slot_discount",
                "slot_count": 2,
                "title": "2 Polos Bundle",
                "description": "Pick any two polos and save 10%.",
                "discount_percent": "10",
                "discount": { "mode": "automatic" },
                "eligibility": { "by_collection": ["polos"] }
            },
            {
                "key": "tops-free-cap",
                "kind": "free_gift_with_purchase",
                "paid_quantity": 4,
                "free_quantity": 1,
                "gift_product_handle": "boat-cap",
                "gift_slots_require_stock": false,
                "title": "4 Tops, Free Cap",
                "description": "",
                "discount": { "mode": "automatic" },
                "eligibility": { "by_collection": ["tops"] }
            }
        ]"#;

        let registry = BundleRegistry::from_json(json).expect("valid JSON registry");
        assert_eq!(registry.iter().count(), 2);
        let duo = registry.get("polo-duo").expect("present");
        assert_eq!(duo.kind.slot_count(), 2);
        assert_eq!(duo.discount_percent(), Decimal::TEN);
        let cap = registry.get("tops-free-cap").expect("present");
        assert_eq!(cap.kind.slot_count(), 5);
        assert_eq!(cap.kind.paid_slot_count(), 4);
        assert!(cap.kind.is_gift_slot(4));
        assert!(!cap.kind.is_gift_slot(3));
    }

    #[test]
    fn test_discount_mode_json_shape() {
        let code = DiscountMode::Code {
            code: "TRIO15".to_string(),
        };
        let json = serde_json::to_value(&code).expect("serializes");
        assert_eq!(json["mode"], "code");
        assert_eq!(json["code"], "TRIO15");
    }
}
