//! # Pairswap AMM - Constant-Product Pools, Routes and Trades
//!
//! ## Purpose
//!
//! Exact-arithmetic client core for Uniswap-V2-style pools: deterministic pair
//! addresses, swap quoting with the 0.3% fee, multi-hop routes, trade simulation
//! with price impact and slippage bounds, and a bounded best-path search over a
//! candidate pool set.
//!
//! ## Integration Points
//!
//! - **Chain data**: [`AmmContext`] wraps a `pairswap_config::ChainRegistry`
//!   (factory, init code hash, router, wrapped native per chain) and owns the
//!   pair-address cache. Every operation that needs chain data borrows it.
//! - **Pool state**: [`Fetcher`] loads tokens and reserves from any
//!   [`PairDataSource`]; callers may also build [`Pair`] values directly.
//! - **Execution**: [`Router`] renders a [`Trade`] as router call arguments.
//!
//! ## Error Model
//!
//! [`AmmError::kind`] separates validation failures from the two pool-local
//! signals (`InsufficientReserves`, `InsufficientInputAmount`) that the path
//! search treats as "skip this pool".
//!
//! ## Example
//!
//! ```no_run
//! use pairswap_amm::{AmmContext, BestTradeOptions, Pair, Trade};
//! use pairswap_types::{Currency, CurrencyAmount};
//!
//! # fn run(pairs: Vec<Pair>, amount_in: CurrencyAmount) -> pairswap_amm::Result<()> {
//! let ctx = AmmContext::builtin();
//! let trades = Trade::best_trade_exact_in(
//!     &ctx,
//!     &pairs,
//!     &amount_in,
//!     &Currency::Native,
//!     BestTradeOptions::default(),
//! )?;
//! for trade in &trades {
//!     println!("{} -> {}", trade.input_amount(), trade.output_amount());
//! }
//! # Ok(())
//! # }
//! ```

pub mod best_trade;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod pair;
pub mod route;
pub mod router;
pub mod trade;

pub use best_trade::{
    input_output_comparator, sorted_insert, trade_comparator, BestTradeOptions, InputOutput,
    SEARCH_WARN_PATH_BOUND,
};
pub use context::{AmmContext, PairAddressCache, DEFAULT_PAIR_ADDRESS_CAPACITY};
pub use error::{AmmError, ErrorKind, Result};
pub use fetcher::{Fetcher, PairDataSource};
pub use pair::{compute_pair_address, Pair, MINIMUM_LIQUIDITY};
pub use route::Route;
pub use router::{CallArgument, Router, SwapParameters, TradeOptions};
pub use trade::{compute_price_impact, Trade, TradeType};
