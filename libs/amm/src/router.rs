//! Swap call arguments for the V2 router contract
//!
//! ## Purpose
//!
//! Turns a simulated [`Trade`] into the method name, ordered arguments and
//! attached native value a router `swap*` call needs. Encoding into ABI calldata
//! is left to the caller's signing stack.
//!
//! Amounts are `0x`-prefixed lowercase hex; addresses are EIP-55 checksummed.

use num_bigint::BigInt;
use pairswap_types::{Address, Percent};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::{AmmError, Result};
use crate::trade::{Trade, TradeType};

/// Caller choices that shape the swap call
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOptions {
    /// Bounds the minimum output or maximum input sent to the router
    pub allowed_slippage: Percent,
    /// Seconds from now until the call expires
    pub ttl: u64,
    pub recipient: Address,
    /// Use the `SupportingFeeOnTransferTokens` variants; exact-input only
    pub fee_on_transfer: bool,
}

/// One positional router argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallArgument {
    Value(String),
    Path(Vec<String>),
}

/// Everything needed to invoke the router for a trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapParameters {
    pub method_name: String,
    pub args: Vec<CallArgument>,
    /// Native value to attach, hex
    pub value: String,
}

fn to_hex(value: &BigInt) -> String {
    format!("0x{value:x}")
}

const ZERO_VALUE: &str = "0x0";

/// Stateless router call builder
#[derive(Debug, Clone, Copy, Default)]
pub struct Router;

impl Router {
    /// Parameters for a swap expiring `options.ttl` seconds from the system clock
    pub fn swap_call_parameters(trade: &Trade, options: &TradeOptions) -> Result<SwapParameters> {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        Self::swap_call_parameters_at(trade, options, now_secs)
    }

    /// Same as [`Router::swap_call_parameters`] with an explicit clock reading
    pub fn swap_call_parameters_at(
        trade: &Trade,
        options: &TradeOptions,
        now_secs: u64,
    ) -> Result<SwapParameters> {
        let eth_in = trade.input_amount().currency().is_native();
        let eth_out = trade.output_amount().currency().is_native();
        if eth_in && eth_out {
            return Err(AmmError::NativeInAndOut);
        }
        if options.ttl == 0 {
            return Err(AmmError::InvalidTtl);
        }

        let to = CallArgument::Value(options.recipient.to_checksum());
        let amount_in = to_hex(trade.maximum_amount_in(&options.allowed_slippage)?.raw());
        let amount_out = to_hex(trade.minimum_amount_out(&options.allowed_slippage)?.raw());
        let path = CallArgument::Path(
            trade
                .route()
                .path()
                .iter()
                .map(|token| token.address.to_checksum())
                .collect(),
        );
        let deadline = CallArgument::Value(format!("0x{:x}", now_secs.saturating_add(options.ttl)));

        let (method_name, args, value) = match trade.trade_type() {
            TradeType::ExactInput => {
                let suffix = if options.fee_on_transfer {
                    "SupportingFeeOnTransferTokens"
                } else {
                    ""
                };
                if eth_in {
                    (
                        format!("swapExactETHForTokens{suffix}"),
                        vec![CallArgument::Value(amount_out), path, to, deadline],
                        amount_in,
                    )
                } else if eth_out {
                    (
                        format!("swapExactTokensForETH{suffix}"),
                        vec![
                            CallArgument::Value(amount_in),
                            CallArgument::Value(amount_out),
                            path,
                            to,
                            deadline,
                        ],
                        ZERO_VALUE.to_string(),
                    )
                } else {
                    (
                        format!("swapExactTokensForTokens{suffix}"),
                        vec![
                            CallArgument::Value(amount_in),
                            CallArgument::Value(amount_out),
                            path,
                            to,
                            deadline,
                        ],
                        ZERO_VALUE.to_string(),
                    )
                }
            }
            TradeType::ExactOutput => {
                if options.fee_on_transfer {
                    return Err(AmmError::ExactOutputFeeOnTransfer);
                }
                if eth_in {
                    (
                        "swapETHForExactTokens".to_string(),
                        vec![CallArgument::Value(amount_out), path, to, deadline],
                        amount_in,
                    )
                } else {
                    let method = if eth_out {
                        "swapTokensForExactETH"
                    } else {
                        "swapTokensForExactTokens"
                    };
                    (
                        method.to_string(),
                        vec![
                            CallArgument::Value(amount_out),
                            CallArgument::Value(amount_in),
                            path,
                            to,
                            deadline,
                        ],
                        ZERO_VALUE.to_string(),
                    )
                }
            }
        };

        debug!(method = %method_name, %value, "Built swap call");
        Ok(SwapParameters {
            method_name,
            args,
            value,
        })
    }
}
