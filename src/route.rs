//! Ordered chains of pairs between an input and output currency.

use crate::currency::{ChainId, Currency, Token};
use crate::error::{Error, Result};
use crate::pair::Pair;
use crate::price::Price;

/// A validated multi-hop path. The token path always has one more entry
/// than the pair list; native assets at either boundary are represented
/// in the path by their wrapped token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pairs: Vec<Pair>,
    path: Vec<Token>,
    input: Currency,
    output: Currency,
}

impl Route {
    /// Validates and builds a route. All pairs must share one chain, the
    /// boundary pairs must touch the (wrapped) input/output currencies,
    /// and each consecutive pair must share a token with its predecessor.
    pub fn new(
        pairs: Vec<Pair>,
        wrapped: &Token,
        input: Currency,
        output: Option<Currency>,
    ) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::InvalidRoute("route needs at least one pair"));
        }
        let chain_id = pairs[0].chain_id();
        if !pairs.iter().all(|pair| pair.chain_id() == chain_id) {
            return Err(Error::InvalidRoute("pairs span multiple chains"));
        }
        if !pairs[0].involves_token(input.wrapped(wrapped)) {
            return Err(Error::InvalidRoute("input currency not in the first pair"));
        }
        if let Some(ref output) = output {
            if !pairs[pairs.len() - 1].involves_token(output.wrapped(wrapped)) {
                return Err(Error::InvalidRoute("output currency not in the last pair"));
            }
        }

        let mut path = vec![input.wrapped(wrapped).clone()];
        for (i, pair) in pairs.iter().enumerate() {
            let current = &path[i];
            let next = if current == pair.token0() {
                pair.token1()
            } else if current == pair.token1() {
                pair.token0()
            } else {
                return Err(Error::InvalidRoute("path discontinuity between pairs"));
            };
            path.push(next.clone());
        }

        let output = output.unwrap_or_else(|| Currency::Token(path[path.len() - 1].clone()));
        Ok(Self { pairs, path, input, output })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Currency {
        &self.input
    }

    pub fn output(&self) -> &Currency {
        &self.output
    }

    pub fn chain_id(&self) -> ChainId {
        self.pairs[0].chain_id()
    }

    /// Compounded mid price across every hop in travel order.
    pub fn mid_price(&self) -> Result<Price> {
        let mut price = self.pairs[0].price_of(&self.path[0])?;
        for (i, pair) in self.pairs.iter().enumerate().skip(1) {
            price = price.multiply(&pair.price_of(&self.path[i])?)?;
        }
        Ok(price)
    }
}
