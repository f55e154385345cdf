//! Raw integer amounts bound to a currency
//!
//! An amount stores `raw / 10^decimals` as a [`Fraction`], so the numerator is always
//! the on-chain integer and the fraction is the human-readable value. Raw amounts
//! must fit a `uint256`; arithmetic re-validates, so subtracting below zero fails.

use num_bigint::BigInt;
use std::fmt;

use crate::currency::{Currency, Token};
use crate::errors::TypesError;
use crate::fraction::{Format, Fraction, Rounding};
use crate::math::{pow10, validate_uint256};

/// Anything an amount can be denominated in
pub trait Denomination: Clone + PartialEq + fmt::Display {
    fn decimals(&self) -> u8;
}

impl Denomination for Currency {
    fn decimals(&self) -> u8 {
        Currency::decimals(self)
    }
}

impl Denomination for Token {
    fn decimals(&self) -> u8 {
        self.decimals
    }
}

/// Raw amount of a currency
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyAmount<C: Denomination = Currency> {
    currency: C,
    fraction: Fraction,
}

/// Amount of a specific token
pub type TokenAmount = CurrencyAmount<Token>;

impl<C: Denomination> CurrencyAmount<C> {
    pub fn new(currency: C, raw: impl Into<BigInt>) -> Result<Self, TypesError> {
        let raw = raw.into();
        validate_uint256(&raw)?;
        let fraction = Fraction::new(raw, pow10(currency.decimals() as u32))?;
        Ok(Self { currency, fraction })
    }

    /// Same currency, different raw amount
    pub fn with_raw(&self, raw: impl Into<BigInt>) -> Result<Self, TypesError> {
        Self::new(self.currency.clone(), raw)
    }

    pub fn currency(&self) -> &C {
        &self.currency
    }

    /// On-chain integer amount
    pub fn raw(&self) -> &BigInt {
        self.fraction.numerator()
    }

    /// Human-scale value, `raw / 10^decimals`
    pub fn as_fraction(&self) -> &Fraction {
        &self.fraction
    }

    pub fn is_zero(&self) -> bool {
        self.fraction.is_zero()
    }

    fn ensure_same_currency(&self, other: &Self) -> Result<(), TypesError> {
        if self.currency != other.currency {
            return Err(TypesError::CurrencyMismatch {
                expected: self.currency.to_string(),
                found: other.currency.to_string(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &Self) -> Result<Self, TypesError> {
        self.ensure_same_currency(other)?;
        self.with_raw(self.raw() + other.raw())
    }

    pub fn subtract(&self, other: &Self) -> Result<Self, TypesError> {
        self.ensure_same_currency(other)?;
        self.with_raw(self.raw() - other.raw())
    }

    pub fn less_than(&self, other: &Self) -> bool {
        self.fraction.less_than(&other.fraction)
    }

    pub fn equal_to(&self, other: &Self) -> bool {
        self.fraction.equal_to(&other.fraction)
    }

    pub fn greater_than(&self, other: &Self) -> bool {
        self.fraction.greater_than(&other.fraction)
    }

    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.fraction.to_significant(significant_digits, rounding)
    }

    pub fn to_significant_with(
        &self,
        significant_digits: u32,
        format: &Format,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.fraction
            .to_significant_with(significant_digits, format, rounding)
    }

    /// Fixed places, at most the currency's decimals
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> Result<String, TypesError> {
        self.to_fixed_with(decimal_places, &Format::default(), rounding)
    }

    pub fn to_fixed_with(
        &self,
        decimal_places: u32,
        format: &Format,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        let decimals = self.currency.decimals();
        if decimal_places > decimals as u32 {
            return Err(TypesError::TooManyDecimals {
                requested: decimal_places,
                decimals,
            });
        }
        Ok(self.fraction.to_fixed_with(decimal_places, format, rounding))
    }

    /// Full-precision value with trailing zeros removed
    pub fn to_exact(&self) -> String {
        self.to_exact_with(&Format::default())
    }

    pub fn to_exact_with(&self, format: &Format) -> String {
        let decimals = self.currency.decimals() as u32;
        let fixed = self.fraction.to_fixed_with(decimals, format, Rounding::Down);
        if decimals == 0 {
            return fixed;
        }
        fixed
            .trim_end_matches('0')
            .trim_end_matches(format.decimal_separator)
            .to_string()
    }
}

impl CurrencyAmount<Currency> {
    /// Amount of the chain's native coin
    pub fn native(raw: impl Into<BigInt>) -> Result<Self, TypesError> {
        Self::new(Currency::Native, raw)
    }

    /// Token view of this amount, `None` for the native coin
    pub fn to_token_amount(&self) -> Option<TokenAmount> {
        self.currency.as_token().map(|token| TokenAmount {
            currency: token.clone(),
            fraction: self.fraction.clone(),
        })
    }
}

impl CurrencyAmount<Token> {
    pub fn token(&self) -> &Token {
        &self.currency
    }
}

impl From<TokenAmount> for CurrencyAmount<Currency> {
    fn from(amount: TokenAmount) -> Self {
        Self {
            currency: Currency::Token(amount.currency),
            fraction: amount.fraction,
        }
    }
}

impl<C: Denomination> fmt::Display for CurrencyAmount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_exact(), self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{Address, ChainId};
    use crate::math::MAX_UINT256;

    fn token(last: u8, decimals: u8) -> Token {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Token::new(ChainId::ETHEREUM, Address::from_bytes(bytes), decimals)
    }

    #[test]
    fn test_rejects_values_outside_uint256() {
        let t = token(1, 18);
        assert!(TokenAmount::new(t.clone(), MAX_UINT256.clone()).is_ok());
        assert!(matches!(
            TokenAmount::new(t.clone(), MAX_UINT256.clone() + 1),
            Err(TypesError::NotUint256(_))
        ));
        assert!(TokenAmount::new(t, -1).is_err());
    }

    #[test]
    fn test_raw_and_fraction() {
        let amount = TokenAmount::new(token(1, 6), 1_500_000u64).unwrap();
        assert_eq!(amount.raw(), &BigInt::from(1_500_000));
        assert_eq!(amount.as_fraction(), &Fraction::new(3, 2).unwrap());
    }

    #[test]
    fn test_add_and_subtract() {
        let t = token(1, 18);
        let a = TokenAmount::new(t.clone(), 5u64).unwrap();
        let b = TokenAmount::new(t.clone(), 3u64).unwrap();
        assert_eq!(a.add(&b).unwrap().raw(), &BigInt::from(8));
        assert_eq!(a.subtract(&b).unwrap().raw(), &BigInt::from(2));
        assert!(b.subtract(&a).is_err());

        let other = TokenAmount::new(token(2, 18), 1u64).unwrap();
        assert!(matches!(
            a.add(&other),
            Err(TypesError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_to_fixed_limited_by_decimals() {
        let amount = TokenAmount::new(token(1, 0), 1000u64).unwrap();
        assert!(matches!(
            amount.to_fixed(3, Rounding::Down),
            Err(TypesError::TooManyDecimals { requested: 3, decimals: 0 })
        ));
        assert_eq!(amount.to_fixed(0, Rounding::Down).unwrap(), "1000");

        let amount = TokenAmount::new(token(1, 18), 500u64).unwrap();
        assert_eq!(amount.to_fixed(3, Rounding::Down).unwrap(), "0.000");
    }

    #[test]
    fn test_to_significant_defaults() {
        let amount = TokenAmount::new(token(1, 0), 1000u64).unwrap();
        assert_eq!(amount.to_significant(3, Rounding::Down).unwrap(), "1000");
        assert_eq!(amount.to_fixed(0, Rounding::Down).unwrap(), "1000");

        let amount = TokenAmount::new(token(1, 18), 500u64).unwrap();
        assert_eq!(
            amount.to_significant(4, Rounding::Down).unwrap(),
            "0.0000000000000005"
        );
    }

    #[test]
    fn test_to_exact() {
        let amount = TokenAmount::new(token(1, 18), 500u64).unwrap();
        assert_eq!(amount.to_exact(), "0.0000000000000005");

        let amount = TokenAmount::new(token(1, 18), 1_234_567_000_000_000_000_000u128).unwrap();
        assert_eq!(amount.to_exact(), "1234.567");
        assert_eq!(amount.to_exact_with(&Format::grouped(',')), "1,234.567");

        let whole = TokenAmount::new(token(1, 18), 2_000_000_000_000_000_000u128).unwrap();
        assert_eq!(whole.to_exact(), "2");

        let integral = TokenAmount::new(token(1, 0), 100u64).unwrap();
        assert_eq!(integral.to_exact(), "100");
    }

    #[test]
    fn test_native_amount() {
        let amount = CurrencyAmount::native(1_000_000_000_000_000_000u128).unwrap();
        assert!(amount.currency().is_native());
        assert_eq!(amount.to_exact(), "1");
        assert!(amount.to_token_amount().is_none());
    }

    #[test]
    fn test_token_amount_conversion() {
        let t = token(7, 6);
        let amount = TokenAmount::new(t.clone(), 42u64).unwrap();
        let general: CurrencyAmount = amount.clone().into();
        assert_eq!(general.currency(), &Currency::Token(t));
        assert_eq!(general.to_token_amount(), Some(amount));
    }
}
