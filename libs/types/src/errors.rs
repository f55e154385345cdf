//! Error types for exact arithmetic and identifier validation
//!
//! Every failure here is a validation failure: the caller supplied arguments that
//! can never succeed, so retrying with the same inputs is pointless.

use thiserror::Error;

use crate::identifiers::ChainId;

/// Errors raised while constructing or combining value types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Fraction denominator would be zero
    #[error("Fraction denominator cannot be zero")]
    ZeroDenominator,

    /// Address string is not 20 bytes of hex
    #[error("Invalid address: '{0}'")]
    InvalidAddress(String),

    /// Mixed-case address whose EIP-55 checksum does not match
    #[error("Address '{0}' has an invalid checksum")]
    InvalidChecksum(String),

    /// Hash string is not 32 bytes of hex
    #[error("Invalid 32-byte hash: '{0}'")]
    InvalidHash(String),

    /// Value does not fit a Solidity uint256
    #[error("{0} is not a uint256")]
    NotUint256(String),

    /// Value does not fit a Solidity uint8
    #[error("{0} is not a uint8")]
    NotUint8(String),

    /// Two tokens live on different chains
    #[error("Chain id mismatch: {left} vs {right}")]
    ChainIdMismatch { left: ChainId, right: ChainId },

    /// Two tokens share an address, so they cannot be ordered
    #[error("Tokens have identical addresses")]
    IdenticalAddresses,

    /// Arithmetic between amounts or prices of different currencies
    #[error("Currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Composing an empty sequence of prices
    #[error("Cannot compose an empty price chain")]
    EmptyPriceChain,

    /// `to_significant` called with zero digits
    #[error("Significant digits must be positive, got {0}")]
    InvalidSignificantDigits(u32),

    /// `to_fixed` on an amount asked for more places than the currency has
    #[error("Requested {requested} decimal places but currency only has {decimals}")]
    TooManyDecimals { requested: u32, decimals: u8 },
}
