//! Configuration error types

use pairswap_types::ChainId;
use thiserror::Error;

/// Errors raised while resolving or loading chain configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No deployment is registered for the chain
    #[error("No configuration for chain {0}")]
    UnknownChain(ChainId),

    /// Configuration source could not be read or parsed
    #[error("Failed to load chain configuration: {0}")]
    Load(String),

    /// A chain entry parsed but is not usable
    #[error("Invalid configuration for chain '{chain}': {reason}")]
    InvalidEntry { chain: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
