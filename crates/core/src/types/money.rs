//! Monetary amounts with decimal arithmetic.
//!
//! Amounts are kept at full precision internally; rounding to two decimal
//! places happens only when a value is formatted for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from monetary arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// Tried to combine amounts in different currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },
}

/// Monetary amount with ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount in the currency's standard unit (dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "USD").
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Add another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`MoneyError::CurrencyMismatch`] if the currencies differ. The
    /// storefront is single-currency, so a mismatch means the catalog data is
    /// wrong and should surface rather than be summed silently.
    pub fn try_add(&self, other: &Self) -> Result<Self, MoneyError> {
        if self.currency_code != other.currency_code {
            return Err(MoneyError::CurrencyMismatch {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            });
        }
        Ok(Self::new(
            self.amount + other.amount,
            self.currency_code.clone(),
        ))
    }

    /// The amount after a percentage discount (e.g., `10` for 10% off).
    ///
    /// Full precision is preserved; call [`Money::rounded`] for display.
    #[must_use]
    pub fn percent_off(&self, percent: Decimal) -> Self {
        let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;
        Self::new(self.amount * factor, self.currency_code.clone())
    }

    /// The amount rounded to two decimal places for display.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(self.amount.round_dp(2), self.currency_code.clone())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} {}", self.amount.round_dp(2), self.currency_code)
    }
}
