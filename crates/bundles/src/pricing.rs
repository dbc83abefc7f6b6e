//! Bundle price aggregation.
//!
//! Two formulas exist and they are deliberately separate functions: the
//! uniform percent-off applies one rate to every resolved slot, while the
//! free-gift formula discounts a strict subset of slots (the gifts) to zero
//! and leaves paid slots at full price. Folding the second into the first
//! with a parameter is how the per-card duplication crept in originally.
//!
//! All arithmetic is `Decimal` at full precision; round only for display via
//! [`BundlePrice::rounded`].

use rust_decimal::Decimal;
use saltline_core::{Money, MoneyError};

use crate::definition::BundleKind;
use crate::selection::BundleInstance;

/// Original vs. discounted display totals for a bundle card.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlePrice {
    /// Sum of resolved slot prices before discount.
    pub original: Money,
    /// Total after the bundle's discount.
    pub discounted: Money,
}

impl BundlePrice {
    /// Both totals rounded to two decimal places for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            original: self.original.rounded(),
            discounted: self.discounted.rounded(),
        }
    }

    /// The display currency.
    #[must_use]
    pub fn currency_code(&self) -> &str {
        &self.original.currency_code
    }
}

/// Sum prices, keeping the currency of the first price seen and falling back
/// to `fallback_currency` when the iterator is empty.
fn sum<'a>(
    prices: impl IntoIterator<Item = &'a Money>,
    fallback_currency: &str,
) -> Result<Money, MoneyError> {
    let mut prices = prices.into_iter();
    let Some(first) = prices.next() else {
        return Ok(Money::zero(fallback_currency));
    };
    prices.try_fold(first.clone(), |acc, price| acc.try_add(price))
}

/// Uniform percent-off pricing over the resolved slot prices.
///
/// `original` is the exact sum; `discounted` is
/// `original * (1 - percent/100)`. With no resolved prices both totals are
/// zero in `fallback_currency`.
///
/// # Errors
///
/// Returns [`MoneyError`] if the prices mix currencies, which a
/// single-currency storefront never produces.
pub fn compute_bundle_price<'a>(
    prices: impl IntoIterator<Item = &'a Money>,
    discount_percent: Decimal,
    fallback_currency: &str,
) -> Result<BundlePrice, MoneyError> {
    let original = sum(prices, fallback_currency)?;
    let discounted = original.percent_off(discount_percent);
    Ok(BundlePrice {
        original,
        discounted,
    })
}

/// Free-gift pricing: the gift slots are shown at full value in `original`
/// and excluded entirely from `discounted`; paid slots are full price in
/// both.
///
/// # Errors
///
/// Returns [`MoneyError`] if the prices mix currencies.
pub fn compute_free_gift_price<'a>(
    paid_prices: impl IntoIterator<Item = &'a Money>,
    gift_prices: impl IntoIterator<Item = &'a Money>,
    fallback_currency: &str,
) -> Result<BundlePrice, MoneyError> {
    let paid_total = sum(paid_prices, fallback_currency)?;
    let original = sum(gift_prices, fallback_currency)?.try_add(&paid_total)?;
    Ok(BundlePrice {
        original,
        discounted: paid_total,
    })
}

/// The display price for a bundle instance, dispatched on its kind.
///
/// Unresolved slots contribute nothing; a freshly mounted card with no
/// resolvable defaults shows zero totals rather than failing.
///
/// # Errors
///
/// Returns [`MoneyError`] if resolved slot prices mix currencies.
pub fn display_price(instance: &BundleInstance) -> Result<BundlePrice, MoneyError> {
    let resolved_prices = |gift: bool| {
        instance
            .slots
            .iter()
            .filter(move |slot| slot.is_gift == gift)
            .filter_map(|slot| slot.resolved.as_ref())
            .map(|resolved| &resolved.price)
    };

    if matches!(
        instance.definition.kind,
        BundleKind::FreeGiftWithPurchase { .. }
    ) {
        compute_free_gift_price(
            resolved_prices(false),
            resolved_prices(true),
            &instance.currency_code,
        )
    } else {
        compute_bundle_price(
            resolved_prices(false),
            instance.definition.discount_percent(),
            &instance.currency_code,
        )
    }
}
