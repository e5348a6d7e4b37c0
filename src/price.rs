//! Currency-tagged exchange rates.

use num_bigint::BigUint;
use std::fmt;

use crate::currency::{Currency, CurrencyAmount};
use crate::error::{Error, Result};
use crate::fraction::{Fraction, Rounding};

/// An exchange rate from a base currency to a quote currency, carried as
/// an exact fraction of raw units (quote per base).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    base: Currency,
    quote: Currency,
    value: Fraction,
}

impl Price {
    /// Price implied by `quote_raw` units of quote per `base_raw` units
    /// of base.
    pub fn new(base: Currency, quote: Currency, base_raw: &BigUint, quote_raw: &BigUint) -> Self {
        Self { base, quote, value: Fraction::new(quote_raw.clone(), base_raw.clone()) }
    }

    pub fn base(&self) -> &Currency {
        &self.base
    }

    pub fn quote(&self) -> &Currency {
        &self.quote
    }

    /// The raw-unit exchange rate.
    pub fn value(&self) -> &Fraction {
        &self.value
    }

    pub fn invert(&self) -> Price {
        Price {
            base: self.quote.clone(),
            quote: self.base.clone(),
            value: self.value.invert(),
        }
    }

    /// Chains two prices: (A -> B) * (B -> C) = (A -> C).
    pub fn multiply(&self, other: &Price) -> Result<Price> {
        if self.quote != other.base {
            return Err(Error::CurrencyMismatch {
                expected: self.quote.to_string(),
                actual: other.base.to_string(),
            });
        }
        Ok(Price {
            base: self.base.clone(),
            quote: other.quote.clone(),
            value: &self.value * &other.value,
        })
    }

    /// Converts a base-currency amount into the equivalent quote-currency
    /// amount, rounding down.
    pub fn quote_amount(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount> {
        if amount.currency() != &self.base {
            return Err(Error::CurrencyMismatch {
                expected: self.base.to_string(),
                actual: amount.currency().to_string(),
            });
        }
        let scaled = &self.value * &Fraction::from(amount.raw());
        let raw = scaled.quotient_floor();
        debug_assert!(!num_traits::Signed::is_negative(&raw));
        Ok(CurrencyAmount::new(self.quote.clone(), raw.magnitude().clone()))
    }

    /// The rate scaled by the two currencies' decimal precisions, for
    /// human-readable display. The native asset counts as 18 decimals.
    pub fn adjusted(&self) -> Fraction {
        let decimals = |currency: &Currency| -> u32 {
            currency.as_token().map(|t| u32::from(t.decimals)).unwrap_or(18)
        };
        let scale = Fraction::new(
            num_bigint::BigInt::from(10u32).pow(decimals(&self.base)),
            num_bigint::BigInt::from(10u32).pow(decimals(&self.quote)),
        );
        &self.value * &scale
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.adjusted().to_fixed(6, Rounding::Floor),
            self.quote,
            self.base
        )
    }
}
