//! Arbitrary-precision rational numbers
//!
//! A [`Fraction`] keeps its numerator and denominator exactly as produced by the
//! arithmetic that created it. Nothing is ever reduced: `1/10 + 4/12` is `52/120`.
//! Equality and ordering compare `a·d` with `c·b`, so `1/3 == 4/12` even though the
//! stored fields differ.
//!
//! Rendering to decimal strings is exact: digits are produced by integer division
//! with an explicit [`Rounding`] mode, never through floating point.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::errors::TypesError;
use crate::math::pow10;

/// Rounding applied when a value is cut to a fixed number of digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rounding {
    /// Toward zero
    Down,
    /// To nearest, ties away from zero
    HalfUp,
    /// Away from zero
    Up,
}

/// Digit grouping for rendered numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub group_separator: Option<char>,
    pub group_size: usize,
    pub decimal_separator: char,
}

impl Default for Format {
    fn default() -> Self {
        Self {
            group_separator: None,
            group_size: 3,
            decimal_separator: '.',
        }
    }
}

impl Format {
    /// Thousands grouping with the given separator, e.g. `1,234.5`
    pub fn grouped(separator: char) -> Self {
        Self {
            group_separator: Some(separator),
            ..Self::default()
        }
    }
}

/// Unreduced rational number with arbitrary-precision fields
#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Create `numerator / denominator` exactly as given
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, TypesError> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return Err(TypesError::ZeroDenominator);
        }
        Ok(Self {
            numerator: numerator.into(),
            denominator,
        })
    }

    /// Whole number `n / 1`
    pub fn from_integer(n: impl Into<BigInt>) -> Self {
        Self {
            numerator: n.into(),
            denominator: BigInt::from(1),
        }
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    /// Integer division truncated toward zero
    pub fn quotient(&self) -> BigInt {
        &self.numerator / &self.denominator
    }

    /// Remainder of [`quotient`](Self::quotient), over the same denominator
    pub fn remainder(&self) -> Fraction {
        Self {
            numerator: &self.numerator % &self.denominator,
            denominator: self.denominator.clone(),
        }
    }

    /// Swap numerator and denominator
    pub fn invert(&self) -> Result<Fraction, TypesError> {
        Self::new(self.denominator.clone(), self.numerator.clone())
    }

    pub fn add(&self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Self {
                numerator: &self.numerator + &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Self {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    pub fn subtract(&self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Self {
                numerator: &self.numerator - &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Self {
            numerator: &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    pub fn multiply(&self, other: &Fraction) -> Fraction {
        Self {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }

    pub fn divide(&self, other: &Fraction) -> Result<Fraction, TypesError> {
        Self::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    /// Compare `a·d` with `c·b`
    fn cross_cmp(&self, other: &Fraction) -> Ordering {
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }

    pub fn less_than(&self, other: &Fraction) -> bool {
        self.cross_cmp(other) == Ordering::Less
    }

    pub fn equal_to(&self, other: &Fraction) -> bool {
        self.cross_cmp(other) == Ordering::Equal
    }

    pub fn greater_than(&self, other: &Fraction) -> bool {
        self.cross_cmp(other) == Ordering::Greater
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    /// Render with `significant_digits` significant digits, trailing zeros stripped
    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.to_significant_with(significant_digits, &Format::default(), rounding)
    }

    pub fn to_significant_with(
        &self,
        significant_digits: u32,
        format: &Format,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        if significant_digits == 0 {
            return Err(TypesError::InvalidSignificantDigits(significant_digits));
        }

        // The quotient is first taken at one extra digit of precision and then cut
        // again, so both steps apply `rounding`.
        let (wide, wide_scale) = round_significant(
            &self.numerator,
            &self.denominator,
            significant_digits + 1,
            rounding,
        );
        let (numerator, denominator) = if wide_scale >= 0 {
            (wide, pow10(wide_scale as u32))
        } else {
            (wide * pow10(wide_scale.unsigned_abs() as u32), BigInt::from(1))
        };
        let (mut mantissa, mut scale) =
            round_significant(&numerator, &denominator, significant_digits, rounding);

        let ten = BigInt::from(10);
        while scale > 0 && !mantissa.is_zero() && (&mantissa % &ten).is_zero() {
            mantissa /= &ten;
            scale -= 1;
        }
        if mantissa.is_zero() {
            scale = 0;
        }
        if scale < 0 {
            mantissa *= pow10(scale.unsigned_abs() as u32);
            scale = 0;
        }

        Ok(render_scaled(&mantissa, scale as u32, format))
    }

    /// Render with exactly `decimal_places` fractional digits
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.to_fixed_with(decimal_places, &Format::default(), rounding)
    }

    pub fn to_fixed_with(&self, decimal_places: u32, format: &Format, rounding: Rounding) -> String {
        let scaled = div_round(
            &(&self.numerator * pow10(decimal_places)),
            &self.denominator,
            rounding,
        );
        render_scaled(&scaled, decimal_places, format)
    }

    /// Lossy decimal view for analytics; `None` when the value exceeds `Decimal` range
    #[cfg(feature = "decimal")]
    pub fn to_decimal(&self) -> Option<rust_decimal::Decimal> {
        use std::str::FromStr;
        rust_decimal::Decimal::from_str(&self.to_fixed(18, Rounding::Down)).ok()
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.equal_to(other)
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cross_cmp(other))
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Self::from_integer(value)
    }
}

impl From<u128> for Fraction {
    fn from(value: u128) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// `n / d` rounded to an integer with the given mode
fn div_round(n: &BigInt, d: &BigInt, rounding: Rounding) -> BigInt {
    let negative = (n.sign() == Sign::Minus) != (d.sign() == Sign::Minus);
    let (d_abs, n_abs) = (d.abs(), n.abs());
    let (q, r) = n_abs.div_rem(&d_abs);

    let bump = match rounding {
        Rounding::Down => false,
        Rounding::Up => !r.is_zero(),
        Rounding::HalfUp => (r * 2u32) >= d_abs,
    };
    let magnitude = if bump { q + 1u32 } else { q };
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Round `n / d` to `digits` significant digits.
///
/// Returns `(m, s)` with the rounded value equal to `m · 10^-s`.
fn round_significant(n: &BigInt, d: &BigInt, digits: u32, rounding: Rounding) -> (BigInt, i64) {
    if n.is_zero() {
        return (BigInt::zero(), 0);
    }
    let (n_abs, d_abs) = (n.abs(), d.abs());

    // exponent of the leading digit: 10^exp <= |n/d| < 10^(exp+1)
    let whole = &n_abs / &d_abs;
    let exponent = if !whole.is_zero() {
        whole.to_string().len() as i64 - 1
    } else {
        let mut shifted = n_abs.clone();
        let mut shift = 0i64;
        while shifted < d_abs {
            shifted *= 10u32;
            shift += 1;
        }
        -shift
    };

    let scale = digits as i64 - 1 - exponent;
    let magnitude = if scale >= 0 {
        div_round(&(&n_abs * pow10(scale as u32)), &d_abs, rounding)
    } else {
        div_round(&n_abs, &(&d_abs * pow10(scale.unsigned_abs() as u32)), rounding)
    };

    let negative = (n.sign() == Sign::Minus) != (d.sign() == Sign::Minus);
    (if negative { -magnitude } else { magnitude }, scale)
}

/// Render `value · 10^-scale` with exactly `scale` fractional digits
fn render_scaled(value: &BigInt, scale: u32, format: &Format) -> String {
    let digits = value.abs().to_string();
    let scale = scale as usize;
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int_part, frac_part) = padded.split_at(padded.len() - scale);

    let mut out = String::with_capacity(padded.len() + 8);
    if value.sign() == Sign::Minus {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, format));
    if scale > 0 {
        out.push(format.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_digits(int_part: &str, format: &Format) -> String {
    let separator = match format.group_separator {
        Some(sep) if format.group_size > 0 => sep,
        _ => return int_part.to_string(),
    };
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / format.group_size);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % format.group_size == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
