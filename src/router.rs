//! Translates finalized trades into router contract call parameters.
//!
//! Output is a method name plus ordered arguments, ready to be submitted
//! verbatim by an external transaction-submission component. Nothing
//! here touches the chain; deadlines are data, not timers.

use alloy_primitives::Address;
use chrono::Utc;

use crate::currency::CurrencyAmount;
use crate::error::{Error, Result};
use crate::fraction::Percent;
use crate::trade::{Trade, TradeType};

/// Transaction deadline: either seconds from now or an absolute unix
/// timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    Ttl(u64),
    Absolute(u64),
}

/// Options for producing swap call parameters.
#[derive(Debug, Clone)]
pub struct TradeOptions {
    /// How much the execution price may move against the trade.
    pub allowed_slippage: Percent,
    /// Account that receives the output of the swap.
    pub recipient: Address,
    pub deadline: Deadline,
    /// Use the fee-on-transfer router methods (exact input only).
    pub fee_on_transfer: bool,
}

/// A single argument of a router method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallArg {
    /// `0x`-prefixed minimal-width hex integer.
    Uint(String),
    /// Checksummed address.
    Address(String),
    /// Ordered token path, as checksummed addresses.
    AddressList(Vec<String>),
}

/// The call an external submitter should make against the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParameters {
    pub method_name: &'static str,
    pub args: Vec<CallArg>,
    /// Native-asset value to attach, hex encoded ("0x0" for token input).
    pub value: String,
}

const ZERO_HEX: &str = "0x0";

fn to_hex(amount: &CurrencyAmount) -> String {
    format!("{:#x}", amount.raw())
}

fn resolve_deadline(deadline: Deadline) -> Result<String> {
    match deadline {
        Deadline::Absolute(timestamp) => Ok(format!("{timestamp:#x}")),
        Deadline::Ttl(ttl) => {
            if ttl == 0 {
                return Err(Error::InvalidTtl);
            }
            let now = Utc::now().timestamp() as u64;
            Ok(format!("{:#x}", now + ttl))
        }
    }
}

/// Produces the router method name, arguments and attached value for a
/// finalized trade.
pub fn swap_call_parameters(trade: &Trade, options: &TradeOptions) -> Result<SwapParameters> {
    let native_in = trade.input_amount().currency().is_native();
    let native_out = trade.output_amount().currency().is_native();
    if native_in && native_out {
        return Err(Error::NativeInAndOut);
    }

    let to = format!("{}", options.recipient);
    let amount_in = to_hex(&trade.maximum_amount_in(&options.allowed_slippage)?);
    let amount_out = to_hex(&trade.minimum_amount_out(&options.allowed_slippage)?);
    let path: Vec<String> = trade
        .route()
        .path()
        .iter()
        .map(|token| format!("{}", token.address))
        .collect();
    let deadline = resolve_deadline(options.deadline)?;

    let (method_name, args, value) = match trade.trade_type() {
        TradeType::ExactInput => {
            if native_in {
                let method = if options.fee_on_transfer {
                    "swapExactETHForTokensSupportingFeeOnTransferTokens"
                } else {
                    "swapExactETHForTokens"
                };
                // (uint amountOutMin, address[] path, address to, uint deadline)
                (
                    method,
                    vec![
                        CallArg::Uint(amount_out),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    amount_in,
                )
            } else if native_out {
                let method = if options.fee_on_transfer {
                    "swapExactTokensForETHSupportingFeeOnTransferTokens"
                } else {
                    "swapExactTokensForETH"
                };
                // (uint amountIn, uint amountOutMin, address[] path, address to, uint deadline)
                (
                    method,
                    vec![
                        CallArg::Uint(amount_in),
                        CallArg::Uint(amount_out),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    ZERO_HEX.to_string(),
                )
            } else {
                let method = if options.fee_on_transfer {
                    "swapExactTokensForTokensSupportingFeeOnTransferTokens"
                } else {
                    "swapExactTokensForTokens"
                };
                (
                    method,
                    vec![
                        CallArg::Uint(amount_in),
                        CallArg::Uint(amount_out),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    ZERO_HEX.to_string(),
                )
            }
        }
        TradeType::ExactOutput => {
            if options.fee_on_transfer {
                return Err(Error::FeeOnTransferExactOutput);
            }
            if native_in {
                // (uint amountOut, address[] path, address to, uint deadline)
                (
                    "swapETHForExactTokens",
                    vec![
                        CallArg::Uint(amount_out),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    amount_in,
                )
            } else if native_out {
                // (uint amountOut, uint amountInMax, address[] path, address to, uint deadline)
                (
                    "swapTokensForExactETH",
                    vec![
                        CallArg::Uint(amount_out),
                        CallArg::Uint(amount_in),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    ZERO_HEX.to_string(),
                )
            } else {
                (
                    "swapTokensForExactTokens",
                    vec![
                        CallArg::Uint(amount_out),
                        CallArg::Uint(amount_in),
                        CallArg::AddressList(path),
                        CallArg::Address(to),
                        CallArg::Uint(deadline),
                    ],
                    ZERO_HEX.to_string(),
                )
            }
        }
    };

    Ok(SwapParameters { method_name, args, value })
}
