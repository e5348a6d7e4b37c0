//! swapquote - exact quoting and routing for constant-product AMMs
//!
//! Computes prices, executable trade quotes and optimal multi-hop trade
//! paths for Uniswap V2-style pools, mirroring the exchange contracts'
//! integer arithmetic exactly. A quote produced here is the amount the
//! chain will settle; any rounding mismatch costs users money.
//!
//! The crate is pure: callers supply reserve snapshots, a factory
//! address for deterministic pair derivation, and a wrapped-native
//! token. Nothing here performs I/O, submits transactions, or mutates
//! shared state - every swap, mint and search step returns a fresh
//! value, which also makes the top level of the best-trade search safe
//! to shard across threads.

pub mod constants;
pub mod currency;
pub mod error;
pub mod fraction;
pub mod pair;
pub mod price;
pub mod route;
pub mod router;
pub mod tokens;
pub mod trade;

pub use constants::{INIT_CODE_HASH, MINIMUM_LIQUIDITY};
pub use currency::{ChainId, Currency, CurrencyAmount, Token};
pub use error::{Error, Result};
pub use fraction::{Fraction, Percent, Rounding};
pub use pair::{compute_pair_address, Pair};
pub use price::Price;
pub use route::Route;
pub use router::{swap_call_parameters, CallArg, Deadline, SwapParameters, TradeOptions};
pub use tokens::wrapped_native;
pub use trade::{
    input_output_comparator, trade_comparator, BestTradeOptions, Trade, TradeType,
};
