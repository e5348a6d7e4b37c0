//! Protocol constants shared across the pair and trade engines.
//!
//! These values must match the deployed pair contracts byte for byte;
//! changing any of them silently desyncs every quote from on-chain
//! execution.

use alloy_primitives::{b256, B256};

/// Keccak hash of the pair contract creation bytecode, used as the
/// CREATE2 init code hash when deriving pair addresses. This value is
/// per-deployment; the canonical Uniswap V2 hash is used here.
pub const INIT_CODE_HASH: B256 =
    b256!("96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");

/// Liquidity permanently locked on the first mint of a pair.
pub const MINIMUM_LIQUIDITY: u64 = 1_000;

/// Swap fee, expressed as FEE_NUMERATOR / FEE_DENOMINATOR retained by
/// the trader (997/1000 = 0.3% fee).
pub(crate) const FEE_NUMERATOR: u64 = 997;
pub(crate) const FEE_DENOMINATOR: u64 = 1_000;

/// Pair liquidity tokens always have 18 decimals regardless of the
/// underlying token decimals.
pub const LIQUIDITY_TOKEN_DECIMALS: u8 = 18;

/// Symbol and name minted onto every pair's liquidity token.
pub const LIQUIDITY_TOKEN_SYMBOL: &str = "UNI-V2";
pub const LIQUIDITY_TOKEN_NAME: &str = "Uniswap V2";
