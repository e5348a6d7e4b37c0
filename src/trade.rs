//! Trade construction, ranking and the best-trade search.
//!
//! A [`Trade`] is fully derived from its route plus the one amount the
//! caller fixed; building one walks the route through the pair engine so
//! every intermediate amount carries the contract's exact rounding. The
//! search explores simple paths over an unordered pair set and keeps a
//! bounded, comparator-ordered list of the best candidates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::currency::{Currency, CurrencyAmount, Token};
use crate::error::{Error, Result};
use crate::fraction::{Fraction, Percent};
use crate::pair::Pair;
use crate::price::Price;
use crate::route::Route;

/// Which side of the trade the caller fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// Limits for the best-trade search.
#[derive(Debug, Clone, Copy)]
pub struct BestTradeOptions {
    /// Maximum number of ranked trades returned.
    pub max_num_results: usize,
    /// Maximum number of pairs a returned trade may traverse.
    pub max_hops: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self { max_num_results: 3, max_hops: 3 }
    }
}

/// Substitutes the wrapped token for a native amount; tokens pass through.
fn wrapped_amount(amount: &CurrencyAmount, wrapped: &Token) -> CurrencyAmount {
    match amount.currency() {
        Currency::Token(_) => amount.clone(),
        Currency::Native { .. } => {
            CurrencyAmount::new(Currency::Token(wrapped.clone()), amount.raw().clone())
        }
    }
}

/// Relative shortfall of the realized output versus the pre-trade mid
/// price: `(mid * input - output) / (mid * input)`.
fn compute_price_impact(
    mid_price: &Price,
    input_amount: &CurrencyAmount,
    output_amount: &CurrencyAmount,
) -> Percent {
    let exact_quote = mid_price.value() * &Fraction::from(input_amount.raw());
    let slippage = &(&exact_quote - &Fraction::from(output_amount.raw())) / &exact_quote;
    Percent::from(slippage)
}

/// An executed-on-paper trade over a route. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    route: Route,
    trade_type: TradeType,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    next_mid_price: Price,
    price_impact: Percent,
}

impl Trade {
    /// Builds a trade by walking the route hop by hop: forward through
    /// `get_output_amount` for exact input, backward through
    /// `get_input_amount` for exact output.
    pub fn new(
        route: Route,
        amount: CurrencyAmount,
        trade_type: TradeType,
        wrapped: &Token,
    ) -> Result<Self> {
        let (amounts, next_pairs) = match trade_type {
            TradeType::ExactInput => {
                if amount.currency() != route.input() {
                    return Err(Error::CurrencyMismatch {
                        expected: route.input().to_string(),
                        actual: amount.currency().to_string(),
                    });
                }
                let mut amounts = vec![wrapped_amount(&amount, wrapped)];
                let mut next_pairs = Vec::with_capacity(route.pairs().len());
                for pair in route.pairs() {
                    let (output, next) = pair.get_output_amount(&amounts[amounts.len() - 1])?;
                    amounts.push(output);
                    next_pairs.push(next);
                }
                (amounts, next_pairs)
            }
            TradeType::ExactOutput => {
                if amount.currency() != route.output() {
                    return Err(Error::CurrencyMismatch {
                        expected: route.output().to_string(),
                        actual: amount.currency().to_string(),
                    });
                }
                let mut amounts = vec![wrapped_amount(&amount, wrapped)];
                let mut next_pairs = Vec::with_capacity(route.pairs().len());
                for pair in route.pairs().iter().rev() {
                    let (input, next) = pair.get_input_amount(&amounts[amounts.len() - 1])?;
                    amounts.push(input);
                    next_pairs.push(next);
                }
                amounts.reverse();
                next_pairs.reverse();
                (amounts, next_pairs)
            }
        };

        // Boundary amounts keep the caller's native representation; the
        // walk above only ever sees wrapped tokens.
        let input_amount = match (trade_type, route.input()) {
            (TradeType::ExactInput, _) => amount.clone(),
            (TradeType::ExactOutput, Currency::Native { chain_id }) => {
                CurrencyAmount::native(*chain_id, amounts[0].raw().clone())
            }
            (TradeType::ExactOutput, Currency::Token(_)) => amounts[0].clone(),
        };
        let output_amount = match (trade_type, route.output()) {
            (TradeType::ExactOutput, _) => amount,
            (TradeType::ExactInput, Currency::Native { chain_id }) => {
                CurrencyAmount::native(*chain_id, amounts[amounts.len() - 1].raw().clone())
            }
            (TradeType::ExactInput, Currency::Token(_)) => amounts[amounts.len() - 1].clone(),
        };

        let execution_price = Price::new(
            input_amount.currency().clone(),
            output_amount.currency().clone(),
            input_amount.raw(),
            output_amount.raw(),
        );
        let price_impact =
            compute_price_impact(&route.mid_price()?, &input_amount, &output_amount);
        let next_mid_price =
            Route::new(next_pairs, wrapped, route.input().clone(), None)?.mid_price()?;

        Ok(Self {
            route,
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            next_mid_price,
            price_impact,
        })
    }

    pub fn exact_in(route: Route, amount_in: CurrencyAmount, wrapped: &Token) -> Result<Self> {
        Self::new(route, amount_in, TradeType::ExactInput, wrapped)
    }

    pub fn exact_out(route: Route, amount_out: CurrencyAmount, wrapped: &Token) -> Result<Self> {
        Self::new(route, amount_out, TradeType::ExactOutput, wrapped)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    /// Realized output per unit of input.
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// The route's mid price recomputed over the post-trade pairs.
    pub fn next_mid_price(&self) -> &Price {
        &self.next_mid_price
    }

    pub fn price_impact(&self) -> &Percent {
        &self.price_impact
    }

    /// Least output the trade guarantees under the given slippage
    /// tolerance. Fixed for exact-output trades; floored otherwise.
    pub fn minimum_amount_out(&self, slippage_tolerance: &Percent) -> Result<CurrencyAmount> {
        if slippage_tolerance.is_negative() {
            return Err(Error::NegativeSlippage);
        }
        match self.trade_type {
            TradeType::ExactOutput => Ok(self.output_amount.clone()),
            TradeType::ExactInput => {
                let adjusted = &(&Fraction::one() + slippage_tolerance.as_fraction()).invert()
                    * &Fraction::from(self.output_amount.raw());
                Ok(CurrencyAmount::new(
                    self.output_amount.currency().clone(),
                    adjusted.quotient_floor().magnitude().clone(),
                ))
            }
        }
    }

    /// Most input the trade may consume under the given slippage
    /// tolerance. Fixed for exact-input trades; rounded up otherwise so
    /// the caller always sends enough.
    pub fn maximum_amount_in(&self, slippage_tolerance: &Percent) -> Result<CurrencyAmount> {
        if slippage_tolerance.is_negative() {
            return Err(Error::NegativeSlippage);
        }
        match self.trade_type {
            TradeType::ExactInput => Ok(self.input_amount.clone()),
            TradeType::ExactOutput => {
                let adjusted = &(&Fraction::one() + slippage_tolerance.as_fraction())
                    * &Fraction::from(self.input_amount.raw());
                Ok(CurrencyAmount::new(
                    self.input_amount.currency().clone(),
                    adjusted.quotient_ceil().magnitude().clone(),
                ))
            }
        }
    }

    /// Execution price after applying the slippage tolerance to both legs.
    pub fn worst_execution_price(&self, slippage_tolerance: &Percent) -> Result<Price> {
        Ok(Price::new(
            self.input_amount.currency().clone(),
            self.output_amount.currency().clone(),
            self.maximum_amount_in(slippage_tolerance)?.raw(),
            self.minimum_amount_out(slippage_tolerance)?.raw(),
        ))
    }

    /// Top `max_num_results` trades from `amount_in` to `currency_out`
    /// over an unordered pair set, using each pair at most once per route
    /// and at most `max_hops` pairs per route. Routes are linear; no
    /// liquidity splitting across parallel routes is considered.
    pub fn best_trade_exact_in(
        pairs: &[Pair],
        amount_in: &CurrencyAmount,
        currency_out: &Currency,
        wrapped: &Token,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        if pairs.is_empty() {
            return Err(Error::EmptyPairs);
        }
        if options.max_hops == 0 {
            return Err(Error::InvalidHopLimit);
        }
        let mut best_trades = Vec::new();
        Self::search_exact_in(
            pairs,
            &wrapped_amount(amount_in, wrapped),
            amount_in,
            currency_out,
            currency_out.wrapped(wrapped),
            wrapped,
            options,
            &mut Vec::new(),
            &mut best_trades,
        )?;
        debug!(
            candidates = pairs.len(),
            results = best_trades.len(),
            "exact-in best-trade search finished"
        );
        Ok(best_trades)
    }

    #[allow(clippy::too_many_arguments)]
    fn search_exact_in(
        pairs: &[Pair],
        amount_in: &CurrencyAmount,
        original_amount_in: &CurrencyAmount,
        currency_out: &Currency,
        token_out: &Token,
        wrapped: &Token,
        options: BestTradeOptions,
        current_pairs: &mut Vec<Pair>,
        best_trades: &mut Vec<Trade>,
    ) -> Result<()> {
        let frontier = amount_in.currency().as_token().ok_or(Error::ExpectedToken)?;
        for (i, pair) in pairs.iter().enumerate() {
            if !pair.involves_token(frontier) {
                continue;
            }
            if pair.reserve0().is_zero() || pair.reserve1().is_zero() {
                continue;
            }
            let (amount_out, _) = match pair.get_output_amount(amount_in) {
                Ok(result) => result,
                // input too small to move this pair; prune the branch
                Err(Error::InsufficientInputAmount) => {
                    trace!(pair = %pair.liquidity_token().address, "branch pruned: zero output");
                    continue;
                }
                Err(error) => return Err(error),
            };
            if amount_out.currency().as_token() == Some(token_out) {
                let mut route_pairs = current_pairs.clone();
                route_pairs.push(pair.clone());
                let route = Route::new(
                    route_pairs,
                    wrapped,
                    original_amount_in.currency().clone(),
                    Some(currency_out.clone()),
                )?;
                let trade =
                    Trade::new(route, original_amount_in.clone(), TradeType::ExactInput, wrapped)?;
                sorted_insert(best_trades, trade, options.max_num_results)?;
            } else if options.max_hops > 1 && pairs.len() > 1 {
                let remaining: Vec<Pair> = pairs[..i]
                    .iter()
                    .chain(pairs[i + 1..].iter())
                    .cloned()
                    .collect();
                current_pairs.push(pair.clone());
                Self::search_exact_in(
                    &remaining,
                    &amount_out,
                    original_amount_in,
                    currency_out,
                    token_out,
                    wrapped,
                    BestTradeOptions { max_hops: options.max_hops - 1, ..options },
                    current_pairs,
                    best_trades,
                )?;
                current_pairs.pop();
            }
        }
        Ok(())
    }

    /// Direction-reversed counterpart of [`Trade::best_trade_exact_in`]:
    /// walks backward from the desired output toward `currency_in`.
    pub fn best_trade_exact_out(
        pairs: &[Pair],
        currency_in: &Currency,
        amount_out: &CurrencyAmount,
        wrapped: &Token,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        if pairs.is_empty() {
            return Err(Error::EmptyPairs);
        }
        if options.max_hops == 0 {
            return Err(Error::InvalidHopLimit);
        }
        let mut best_trades = Vec::new();
        Self::search_exact_out(
            pairs,
            currency_in,
            currency_in.wrapped(wrapped),
            &wrapped_amount(amount_out, wrapped),
            amount_out,
            wrapped,
            options,
            &mut Vec::new(),
            &mut best_trades,
        )?;
        debug!(
            candidates = pairs.len(),
            results = best_trades.len(),
            "exact-out best-trade search finished"
        );
        Ok(best_trades)
    }

    #[allow(clippy::too_many_arguments)]
    fn search_exact_out(
        pairs: &[Pair],
        currency_in: &Currency,
        token_in: &Token,
        amount_out: &CurrencyAmount,
        original_amount_out: &CurrencyAmount,
        wrapped: &Token,
        options: BestTradeOptions,
        current_pairs: &mut Vec<Pair>,
        best_trades: &mut Vec<Trade>,
    ) -> Result<()> {
        let frontier = amount_out.currency().as_token().ok_or(Error::ExpectedToken)?;
        for (i, pair) in pairs.iter().enumerate() {
            if !pair.involves_token(frontier) {
                continue;
            }
            if pair.reserve0().is_zero() || pair.reserve1().is_zero() {
                continue;
            }
            let (amount_in, _) = match pair.get_input_amount(amount_out) {
                Ok(result) => result,
                // this pair cannot cover the requested output; prune
                Err(Error::InsufficientReserves) => {
                    trace!(pair = %pair.liquidity_token().address, "branch pruned: reserve too low");
                    continue;
                }
                Err(error) => return Err(error),
            };
            if amount_in.currency().as_token() == Some(token_in) {
                let mut route_pairs = Vec::with_capacity(current_pairs.len() + 1);
                route_pairs.push(pair.clone());
                route_pairs.extend(current_pairs.iter().cloned());
                let route = Route::new(
                    route_pairs,
                    wrapped,
                    currency_in.clone(),
                    Some(original_amount_out.currency().clone()),
                )?;
                let trade = Trade::new(
                    route,
                    original_amount_out.clone(),
                    TradeType::ExactOutput,
                    wrapped,
                )?;
                sorted_insert(best_trades, trade, options.max_num_results)?;
            } else if options.max_hops > 1 && pairs.len() > 1 {
                let remaining: Vec<Pair> = pairs[..i]
                    .iter()
                    .chain(pairs[i + 1..].iter())
                    .cloned()
                    .collect();
                current_pairs.insert(0, pair.clone());
                Self::search_exact_out(
                    &remaining,
                    currency_in,
                    token_in,
                    &amount_in,
                    original_amount_out,
                    wrapped,
                    BestTradeOptions { max_hops: options.max_hops - 1, ..options },
                    current_pairs,
                    best_trades,
                )?;
                current_pairs.remove(0);
            }
        }
        Ok(())
    }
}

/// Orders trades by most output, then least input. Trades must share
/// both input and output currencies.
pub fn input_output_comparator(a: &Trade, b: &Trade) -> Result<Ordering> {
    if a.input_amount.currency() != b.input_amount.currency() {
        return Err(Error::CurrencyMismatch {
            expected: a.input_amount.currency().to_string(),
            actual: b.input_amount.currency().to_string(),
        });
    }
    match a.output_amount.cmp_value(&b.output_amount)? {
        Ordering::Equal => a.input_amount.cmp_value(&b.input_amount),
        Ordering::Less => Ok(Ordering::Greater),
        Ordering::Greater => Ok(Ordering::Less),
    }
}

/// Full ranking: output/input first, then lower price impact, then
/// fewer hops.
pub fn trade_comparator(a: &Trade, b: &Trade) -> Result<Ordering> {
    match input_output_comparator(a, b)? {
        Ordering::Equal => Ok(a
            .price_impact
            .cmp(&b.price_impact)
            .then_with(|| a.route.path().len().cmp(&b.route.path().len()))),
        decided => Ok(decided),
    }
}

/// Inserts into a comparator-sorted list capped at `max_size`, keeping
/// equal-ranked entries in arrival order.
fn sorted_insert(trades: &mut Vec<Trade>, add: Trade, max_size: usize) -> Result<()> {
    let mut index = trades.len();
    for (i, existing) in trades.iter().enumerate() {
        if trade_comparator(&add, existing)? == Ordering::Less {
            index = i;
            break;
        }
    }
    if index == trades.len() && trades.len() >= max_size {
        return Ok(());
    }
    trades.insert(index, add);
    trades.truncate(max_size);
    Ok(())
}
