//! AMM error types
//!
//! Two failures are expected while exploring pools: a pool with an empty side
//! ([`AmmError::InsufficientReserves`]) and a swap too small to produce output
//! ([`AmmError::InsufficientInputAmount`]). Everything else is a caller mistake or
//! a data-source failure.

use pairswap_config::ConfigError;
use pairswap_types::{Address, ChainId, TypesError};
use thiserror::Error;

/// Coarse classification used to decide whether a failure aborts a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Arguments can never succeed; do not retry
    Validation,
    /// A pool side is empty or cannot cover the requested output
    InsufficientReserves,
    /// The swap would produce nothing
    InsufficientInput,
    /// On-chain data retrieval failed
    DataSource,
}

/// Errors raised by pool math, routing and trade construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    #[error("Insufficient reserves")]
    InsufficientReserves,

    #[error("Insufficient input amount")]
    InsufficientInputAmount,

    /// Token is neither side of the pair
    #[error("Token {token} is not in the pair")]
    TokenNotInPair { token: Address },

    #[error("Chain id mismatch: expected {expected}, found {found}")]
    ChainIdMismatch { expected: ChainId, found: ChainId },

    #[error("Route has no pairs")]
    EmptyRoute,

    #[error("No candidate pairs to search")]
    NoCandidatePairs,

    /// First pair does not hold the input token
    #[error("Route input is not in the first pair")]
    InputNotInRoute,

    /// Last pair does not hold the output token
    #[error("Route output is not in the last pair")]
    OutputNotInRoute,

    /// Pair at `hop` shares no token with the previous hop
    #[error("Route is disconnected at hop {hop}")]
    DisconnectedPath { hop: usize },

    /// Amount is denominated in something other than the expected currency
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Supply or liquidity amount is not the pair's liquidity token
    #[error("Amount is not denominated in the pair's liquidity token")]
    LiquidityTokenMismatch,

    #[error("Liquidity exceeds total supply")]
    LiquidityExceedsSupply,

    #[error("Slippage tolerance must not be negative")]
    NegativeSlippage,

    #[error("Invalid search options: {0}")]
    InvalidOptions(String),

    #[error("Cannot trade native currency on both sides")]
    NativeInAndOut,

    #[error("Deadline ttl must be positive")]
    InvalidTtl,

    #[error("Fee-on-transfer tokens are only supported for exact-input trades")]
    ExactOutputFeeOnTransfer,

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Token or reserve lookup failed
    #[error("Data source error: {0}")]
    DataSource(String),
}

impl AmmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AmmError::InsufficientReserves => ErrorKind::InsufficientReserves,
            AmmError::InsufficientInputAmount => ErrorKind::InsufficientInput,
            AmmError::DataSource(_) => ErrorKind::DataSource,
            _ => ErrorKind::Validation,
        }
    }

    /// Pool-local failures the path search steps over
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InsufficientReserves | ErrorKind::InsufficientInput
        )
    }
}

pub type Result<T> = std::result::Result<T, AmmError>;
