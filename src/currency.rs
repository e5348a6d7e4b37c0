//! Currency identities and exact amounts.
//!
//! A currency is either the chain's native asset or a fungible token.
//! Pools only ever hold tokens; the native asset is substituted by its
//! wrapped token at route boundaries.

use alloy_primitives::Address;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

pub type ChainId = u64;

/// A fungible token on a specific chain.
///
/// Identity is (chain id, address); decimals, symbol and name are
/// display metadata and do not participate in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl Token {
    pub fn new(
        chain_id: ChainId,
        address: Address,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self { chain_id, address, decimals, symbol: symbol.into(), name: name.into() }
    }

    /// Canonical pair ordering: by chain, then by address.
    ///
    /// Comparing tokens on different chains or a token against itself is
    /// a caller error.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.chain_id != other.chain_id {
            return Err(Error::ChainMismatch(self.chain_id, other.chain_id));
        }
        match self.address.cmp(&other.address) {
            Ordering::Less => Ok(true),
            Ordering::Greater => Ok(false),
            Ordering::Equal => Err(Error::IdenticalTokens),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.symbol.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{}", self.symbol)
        }
    }
}

/// A tradeable asset: the chain's native asset or a [`Token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Native { chain_id: ChainId },
    Token(Token),
}

impl Currency {
    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native { .. })
    }

    pub fn is_token(&self) -> bool {
        matches!(self, Currency::Token(_))
    }

    pub fn chain_id(&self) -> ChainId {
        match self {
            Currency::Native { chain_id } => *chain_id,
            Currency::Token(token) => token.chain_id,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Currency::Native { .. } => None,
            Currency::Token(token) => Some(token),
        }
    }

    /// The token that stands in for this currency inside pools: itself
    /// for a token, the supplied wrapper for the native asset.
    pub fn wrapped<'a>(&'a self, wrapped: &'a Token) -> &'a Token {
        match self {
            Currency::Token(token) => token,
            Currency::Native { .. } => wrapped,
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Native { .. } => write!(f, "ETH"),
            Currency::Token(token) => write!(f, "{token}"),
        }
    }
}

/// A non-negative quantity of a currency, in its smallest unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyAmount {
    currency: Currency,
    raw: BigUint,
}

impl CurrencyAmount {
    pub fn new(currency: Currency, raw: impl Into<BigUint>) -> Self {
        Self { currency, raw: raw.into() }
    }

    pub fn native(chain_id: ChainId, raw: impl Into<BigUint>) -> Self {
        Self::new(Currency::Native { chain_id }, raw)
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn raw(&self) -> &BigUint {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        use num_traits::Zero;
        self.raw.is_zero()
    }

    fn require_same_currency(&self, other: &CurrencyAmount) -> Result<()> {
        if self.currency != other.currency {
            return Err(Error::CurrencyMismatch {
                expected: self.currency.to_string(),
                actual: other.currency.to_string(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.require_same_currency(other)?;
        Ok(Self::new(self.currency.clone(), &self.raw + &other.raw))
    }

    pub fn checked_sub(&self, other: &CurrencyAmount) -> Result<CurrencyAmount> {
        self.require_same_currency(other)?;
        if other.raw > self.raw {
            return Err(Error::AmountUnderflow);
        }
        Ok(Self::new(self.currency.clone(), &self.raw - &other.raw))
    }

    /// Value comparison; amounts of different currencies do not order.
    pub fn cmp_value(&self, other: &CurrencyAmount) -> Result<Ordering> {
        self.require_same_currency(other)?;
        Ok(self.raw.cmp(&other.raw))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.raw, self.currency)
    }
}
