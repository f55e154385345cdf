//! # Pairswap Types Library
//!
//! Exact-rational value types shared by every pricing and routing component.
//!
//! ## Design Philosophy
//!
//! - **No Precision Loss**: All values are arbitrary-precision rationals (`BigInt` numerator
//!   and denominator), never fixed-width integers or floats
//! - **Unreduced Fractions**: Results of arithmetic are kept in cross-multiplied form;
//!   equality and ordering compare `a·d` against `c·b`
//! - **Composition over Inheritance**: [`Percent`], [`Price`] and [`CurrencyAmount`] wrap a
//!   [`Fraction`] and add their own formatting and derivation rules
//! - **Structural Identity**: [`Currency`] is a tagged variant compared by value
//!
//! ## Quick Start
//!
//! ```rust
//! use pairswap_types::{ChainId, Fraction, Rounding, Token, TokenAmount};
//!
//! let third = Fraction::new(1, 3)?;
//! assert_eq!(third.to_fixed(4, Rounding::HalfUp), "0.3333");
//!
//! let dai = Token::new(ChainId::ETHEREUM, "0x6B175474E89094C44Da98b954EedeAC495271d0F".parse()?, 18)
//!     .with_symbol("DAI");
//! let amount = TokenAmount::new(dai, 1_500_000_000_000_000_000u128)?;
//! assert_eq!(amount.to_exact(), "1.5");
//! # Ok::<(), pairswap_types::TypesError>(())
//! ```
//!
//! ## Integration Points
//!
//! - **Config**: chain identifiers and addresses for the per-chain deployment table
//! - **AMM**: reserves, prices and trade amounts for pool math and path search

pub mod amount;
pub mod currency;
pub mod errors;
pub mod fraction;
pub mod identifiers;
pub mod math;
pub mod percent;
pub mod price;

pub use amount::{CurrencyAmount, Denomination, TokenAmount};
pub use currency::{Currency, Token, NATIVE_DECIMALS};
pub use errors::TypesError;
pub use fraction::{Format, Fraction, Rounding};
pub use identifiers::{keccak256, Address, ChainId, Hash256};
pub use percent::Percent;
pub use price::{Price, PRICE_DEFAULT_FIXED, PRICE_DEFAULT_SIGNIFICANT};

/// Arbitrary-precision integer used for every raw amount and fraction field
pub use num_bigint::BigInt;

pub type Result<T> = std::result::Result<T, TypesError>;
