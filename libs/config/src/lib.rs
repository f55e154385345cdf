//! # Pairswap Chain Configuration
//!
//! Deployment data each supported chain needs for pool address derivation, native
//! coin wrapping and router calls.
//!
//! ## Features
//!
//! - **Built-in Deployments**: Ethereum, BSC, BSC testnet and Sepolia
//! - **File Overrides**: TOML tables keyed by chain id, merged over the built-ins
//! - **Environment Overrides**: `PAIRSWAP__CHAINS__<id>__<FIELD>` variables
//!
//! ## Usage
//!
//! ```rust
//! use pairswap_config::ChainRegistry;
//! use pairswap_types::ChainId;
//!
//! let registry = ChainRegistry::builtin();
//! let weth = registry.wrapped_native(ChainId::ETHEREUM)?;
//! assert_eq!(weth.symbol.as_deref(), Some("WETH"));
//! # Ok::<(), pairswap_config::ConfigError>(())
//! ```

pub mod chains;
pub mod error;
pub mod loader;

pub use chains::{ChainConfig, ChainRegistry, WrappedNative};
pub use error::{ConfigError, Result};
pub use loader::ENV_PREFIX;
