//! Exchange rates between two currencies
//!
//! A [`Price`] stores the raw ratio `quote_raw / base_raw` of on-chain integer
//! amounts. Human-facing rendering multiplies by `10^base_decimals / 10^quote_decimals`
//! so that decimals of both currencies cancel out.

use num_bigint::BigInt;
use std::fmt;

use crate::amount::CurrencyAmount;
use crate::currency::Currency;
use crate::errors::TypesError;
use crate::fraction::{Format, Fraction, Rounding};
use crate::math::pow10;

/// Significant digits used by [`Price`]'s `Display`
pub const PRICE_DEFAULT_SIGNIFICANT: u32 = 6;
/// Conventional fixed places for prices
pub const PRICE_DEFAULT_FIXED: u32 = 4;

/// Units of `quote` per unit of `base`
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    base: Currency,
    quote: Currency,
    ratio: Fraction,
    scalar: Fraction,
}

impl Price {
    /// `denominator` and `numerator` are raw amounts of `base` and `quote`
    pub fn new(
        base: Currency,
        quote: Currency,
        denominator: impl Into<BigInt>,
        numerator: impl Into<BigInt>,
    ) -> Result<Self, TypesError> {
        let ratio = Fraction::new(numerator, denominator)?;
        let scalar = Fraction::new(
            pow10(base.decimals() as u32),
            pow10(quote.decimals() as u32),
        )?;
        Ok(Self {
            base,
            quote,
            ratio,
            scalar,
        })
    }

    /// Chain prices end to end: `a→b`, `b→c`, ... becomes `a→z`
    pub fn compose(prices: &[Price]) -> Result<Price, TypesError> {
        let (first, rest) = prices.split_first().ok_or(TypesError::EmptyPriceChain)?;
        rest.iter()
            .try_fold(first.clone(), |acc, next| acc.multiply(next))
    }

    pub fn base_currency(&self) -> &Currency {
        &self.base
    }

    pub fn quote_currency(&self) -> &Currency {
        &self.quote
    }

    /// Ratio of raw amounts, no decimal adjustment
    pub fn raw(&self) -> &Fraction {
        &self.ratio
    }

    pub fn scalar(&self) -> &Fraction {
        &self.scalar
    }

    /// Ratio of human-scale amounts
    pub fn adjusted(&self) -> Fraction {
        self.ratio.multiply(&self.scalar)
    }

    pub fn invert(&self) -> Result<Price, TypesError> {
        Price::new(
            self.quote.clone(),
            self.base.clone(),
            self.ratio.numerator().clone(),
            self.ratio.denominator().clone(),
        )
    }

    /// `self.quote` must be `other.base`
    pub fn multiply(&self, other: &Price) -> Result<Price, TypesError> {
        if self.quote != other.base {
            return Err(TypesError::CurrencyMismatch {
                expected: self.quote.to_string(),
                found: other.base.to_string(),
            });
        }
        let product = self.ratio.multiply(&other.ratio);
        Price::new(
            self.base.clone(),
            other.quote.clone(),
            product.denominator().clone(),
            product.numerator().clone(),
        )
    }

    /// Convert an amount of `base` into `quote`, flooring the raw result
    pub fn quote(&self, amount: &CurrencyAmount) -> Result<CurrencyAmount, TypesError> {
        if amount.currency() != &self.base {
            return Err(TypesError::CurrencyMismatch {
                expected: self.base.to_string(),
                found: amount.currency().to_string(),
            });
        }
        let quoted = self
            .ratio
            .multiply(&Fraction::from_integer(amount.raw().clone()))
            .quotient();
        CurrencyAmount::new(self.quote.clone(), quoted)
    }

    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.adjusted().to_significant(significant_digits, rounding)
    }

    pub fn to_significant_with(
        &self,
        significant_digits: u32,
        format: &Format,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.adjusted()
            .to_significant_with(significant_digits, format, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.adjusted().to_fixed(decimal_places, rounding)
    }

    pub fn to_fixed_with(&self, decimal_places: u32, format: &Format, rounding: Rounding) -> String {
        self.adjusted()
            .to_fixed_with(decimal_places, format, rounding)
    }

    #[cfg(feature = "decimal")]
    pub fn to_decimal(&self) -> Option<rust_decimal::Decimal> {
        self.adjusted().to_decimal()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self
            .to_significant(PRICE_DEFAULT_SIGNIFICANT, Rounding::HalfUp)
            .map_err(|_| fmt::Error)?;
        write!(f, "{value} {}/{}", self.quote, self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Token;
    use crate::identifiers::{Address, ChainId};

    fn token(last: u8, decimals: u8) -> Currency {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Token::new(ChainId::ETHEREUM, Address::from_bytes(bytes), decimals).into()
    }

    #[test]
    fn test_adjusted_cancels_decimals() {
        // 1 unit of an 18-decimal token costs 2000 units of a 6-decimal token
        let weth = token(1, 18);
        let usdc = token(2, 6);
        let price = Price::new(weth, usdc, 1_000_000_000_000_000_000u128, 2_000_000_000u64).unwrap();

        assert_eq!(price.to_significant(6, Rounding::HalfUp).unwrap(), "2000");
        assert_eq!(price.to_fixed(PRICE_DEFAULT_FIXED, Rounding::HalfUp), "2000.0000");
        assert_eq!(price.invert().unwrap().to_significant(3, Rounding::HalfUp).unwrap(), "0.0005");
    }

    #[test]
    fn test_multiply_requires_matching_currency() {
        let (a, b, c) = (token(1, 18), token(2, 18), token(3, 18));
        let ab = Price::new(a.clone(), b.clone(), 1, 2).unwrap();
        let bc = Price::new(b, c.clone(), 1, 3).unwrap();

        let ac = ab.multiply(&bc).unwrap();
        assert_eq!(ac.base_currency(), &a);
        assert_eq!(ac.quote_currency(), &c);
        assert_eq!(ac.raw(), &Fraction::new(6, 1).unwrap());

        assert!(matches!(
            bc.multiply(&ab),
            Err(TypesError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_compose() {
        let (a, b, c) = (token(1, 18), token(2, 18), token(3, 18));
        let prices = [
            Price::new(a.clone(), b.clone(), 2, 1).unwrap(),
            Price::new(b, c, 5, 3).unwrap(),
        ];
        let composed = Price::compose(&prices).unwrap();
        assert_eq!(composed.base_currency(), &a);
        assert_eq!(composed.raw(), &Fraction::new(3, 10).unwrap());
        assert_eq!(Price::compose(&[]).unwrap_err(), TypesError::EmptyPriceChain);
    }

    #[test]
    fn test_quote_floors() {
        let (a, b) = (token(1, 0), token(2, 0));
        let price = Price::new(a.clone(), b.clone(), 3, 10).unwrap();
        let amount = CurrencyAmount::new(a, 2u64).unwrap();
        let quoted = price.quote(&amount).unwrap();
        assert_eq!(quoted.currency(), &b);
        assert_eq!(quoted.raw(), &BigInt::from(6));

        let wrong = CurrencyAmount::new(b, 2u64).unwrap();
        assert!(price.quote(&wrong).is_err());
    }

    #[test]
    fn test_display() {
        let a: Currency = Token::new(ChainId::ETHEREUM, Address::ZERO, 0)
            .with_symbol("AAA")
            .into();
        let price = Price::new(Currency::Native, a, 1_000_000_000_000_000_000u128, 5u64).unwrap();
        assert_eq!(price.to_string(), "5 AAA/ETH");
    }
}
