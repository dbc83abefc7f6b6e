//! Loose upstream payload shapes and their normalization.
//!
//! The hosted API's product shape is permissive; fields come and go with API
//! versions and apps. These raw types accept that looseness, and
//! [`RawProduct::normalize`] is the single place where it is converted into
//! the strict `saltline-core` records. Everything past this module can rely
//! on the invariants `Product::validate` enforces.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use saltline_core::{
    Image, Money, OptionAxis, OptionValue, Product, SelectedOption, Variant,
};

use crate::CatalogError;

/// Money as the upstream API ships it: decimal amount as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMoney {
    pub amount: Option<String>,
    #[serde(alias = "currencyCode")]
    pub currency_code: Option<String>,
}

/// Option value, either a bare string or an object with swatch hints.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawOptionValue {
    Name(String),
    Swatch {
        name: String,
        #[serde(default, alias = "swatchColor")]
        swatch_color: Option<String>,
        #[serde(default, alias = "swatchImageUrl")]
        swatch_image_url: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOptionAxis {
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<RawOptionValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSelectedOption {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawImage {
    pub url: Option<String>,
    #[serde(default, alias = "altText")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    pub id: Option<String>,
    #[serde(default, alias = "selectedOptions")]
    pub selected_options: Vec<RawSelectedOption>,
    pub price: Option<RawMoney>,
    #[serde(default, alias = "compareAtPrice")]
    pub compare_at_price: Option<RawMoney>,
    #[serde(default, alias = "availableForSale")]
    pub available_for_sale: Option<bool>,
    #[serde(default)]
    pub image: Option<RawImage>,
}

/// A product as fetched, before any validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    pub id: Option<String>,
    pub handle: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub options: Vec<RawOptionAxis>,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
}

impl RawProduct {
    /// Normalize into a validated [`Product`].
    ///
    /// # Errors
    ///
    /// [`CatalogError::Malformed`] when required fields are missing or
    /// unparseable, [`CatalogError::Invalid`] when the normalized product
    /// violates the variant/option invariants.
    pub fn normalize(self) -> Result<Product, CatalogError> {
        let handle = self.handle.clone().unwrap_or_else(|| "<no handle>".to_string());
        let malformed = |reason: &str| CatalogError::Malformed {
            handle: handle.clone(),
            reason: reason.to_string(),
        };

        let product = Product {
            id: self.id.ok_or_else(|| malformed("missing id"))?,
            handle: self.handle.ok_or_else(|| malformed("missing handle"))?,
            title: self.title.ok_or_else(|| malformed("missing title"))?,
            options: self
                .options
                .into_iter()
                .map(|axis| normalize_axis(axis, &handle))
                .collect::<Result<_, _>>()?,
            variants: self
                .variants
                .into_iter()
                .map(|variant| normalize_variant(variant, &handle))
                .collect::<Result<_, _>>()?,
        };

        if product.variants.is_empty() {
            return Err(malformed("product has no variants"));
        }

        product.validate()?;
        Ok(product)
    }
}

fn normalize_axis(axis: RawOptionAxis, handle: &str) -> Result<OptionAxis, CatalogError> {
    let name = axis.name.ok_or_else(|| CatalogError::Malformed {
        handle: handle.to_string(),
        reason: "option axis missing name".to_string(),
    })?;
    let values = axis
        .values
        .into_iter()
        .map(|value| match value {
            RawOptionValue::Name(name) => OptionValue::plain(name),
            RawOptionValue::Swatch {
                name,
                swatch_color,
                swatch_image_url,
            } => OptionValue {
                name,
                swatch_color,
                swatch_image_url,
            },
        })
        .collect();
    Ok(OptionAxis { name, values })
}

fn normalize_variant(variant: RawVariant, handle: &str) -> Result<Variant, CatalogError> {
    let malformed = |reason: String| CatalogError::Malformed {
        handle: handle.to_string(),
        reason,
    };

    let id = variant
        .id
        .ok_or_else(|| malformed("variant missing id".to_string()))?;
    let price = variant
        .price
        .ok_or_else(|| malformed(format!("variant {id} missing price")))
        .and_then(|raw| normalize_money(raw, &id, handle))?;
    let compare_at_price = match variant.compare_at_price {
        Some(raw) => Some(normalize_money(raw, &id, handle)?),
        None => None,
    };

    Ok(Variant {
        id,
        selected_options: variant
            .selected_options
            .into_iter()
            .filter_map(|opt| {
                let (name, value) = (opt.name?, opt.value?);
                Some(SelectedOption { name, value })
            })
            .collect(),
        price,
        compare_at_price,
        // Missing availability flags mean "not sellable", never "assume yes".
        available_for_sale: variant.available_for_sale.unwrap_or(false),
        image: variant.image.and_then(|img| {
            Some(Image {
                url: img.url?,
                alt_text: img.alt_text,
            })
        }),
    })
}

fn normalize_money(raw: RawMoney, variant_id: &str, handle: &str) -> Result<Money, CatalogError> {
    let malformed = |reason: String| CatalogError::Malformed {
        handle: handle.to_string(),
        reason,
    };

    let amount_text = raw
        .amount
        .ok_or_else(|| malformed(format!("variant {variant_id} price missing amount")))?;
    let amount: Decimal = amount_text
        .parse()
        .map_err(|_| malformed(format!("variant {variant_id} has unparseable amount '{amount_text}'")))?;

    Ok(Money::new(
        amount,
        raw.currency_code
            .ok_or_else(|| malformed(format!("variant {variant_id} price missing currency")))?,
    ))
}

/// Normalize a list of raw products, dropping the ones that fail instead of
/// failing the whole list. A collection with one broken product still
/// renders its bundles from the rest.
#[must_use]
pub fn normalize_products(raw: Vec<RawProduct>) -> Vec<Product> {
    raw.into_iter()
        .filter_map(|raw_product| match raw_product.normalize() {
            Ok(product) => Some(product),
            Err(error) => {
                warn!(%error, "dropping malformed product from catalog response");
                None
            }
        })
        .collect()
}
