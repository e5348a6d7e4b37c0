//! Error taxonomy for the quoting core.
//!
//! Two of these variants are expected, recoverable outcomes during the
//! best-trade search (`InsufficientReserves`, `InsufficientInputAmount`)
//! and are caught there to prune a branch. Everything else is a caller
//! precondition violation and propagates unmodified - there is no retry
//! anywhere in this crate.

use alloy_primitives::Address;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A pair has a zero reserve on one side, or an exact-output request
    /// meets or exceeds the available reserve.
    #[error("insufficient reserves to serve the requested amount")]
    InsufficientReserves,

    /// The computed output (or minted liquidity) would be zero.
    #[error("input amount too small to produce any output")]
    InsufficientInputAmount,

    /// Arithmetic between amounts of two different currencies.
    #[error("currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch { expected: String, actual: String },

    /// Tokens from different chains were combined.
    #[error("chain mismatch: {0} vs {1}")]
    ChainMismatch(u64, u64),

    /// A token was ordered or paired against itself.
    #[error("identical token addresses")]
    IdenticalTokens,

    /// A token-denominated amount was required (pair reserves and swap
    /// legs are always tokens; native assets enter via their wrapper).
    #[error("expected a token-denominated amount")]
    ExpectedToken,

    /// The token is not one of the pair's two components.
    #[error("token {0} is not a component of this pair")]
    TokenNotInPair(Address),

    /// Amount subtraction would go below zero.
    #[error("amount underflow")]
    AmountUnderflow,

    /// Liquidity amount larger than the pool's total supply.
    #[error("liquidity amount exceeds total supply")]
    LiquidityAboveSupply,

    /// Protocol-fee valuation requested without the last recorded k.
    #[error("k_last is required when the protocol fee is on")]
    MissingKLast,

    /// A route failed structural validation.
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),

    /// Slippage tolerance below zero.
    #[error("slippage tolerance cannot be negative")]
    NegativeSlippage,

    /// Best-trade search called with no candidate pairs.
    #[error("no candidate pairs supplied")]
    EmptyPairs,

    /// Best-trade search called with a zero hop limit.
    #[error("max_hops must be positive")]
    InvalidHopLimit,

    /// Native asset on both legs of a swap; no such router method exists.
    #[error("cannot route native asset to native asset")]
    NativeInAndOut,

    /// The router contracts cannot combine fee-on-transfer semantics
    /// with an exact output.
    #[error("fee-on-transfer is not supported for exact-output trades")]
    FeeOnTransferExactOutput,

    /// Transaction ttl must be in the future.
    #[error("ttl must be positive")]
    InvalidTtl,
}
