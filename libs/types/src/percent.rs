//! Ratios rendered as percentages

use std::fmt;

use crate::errors::TypesError;
use crate::fraction::{Format, Fraction, Rounding};

/// Ratio whose rendering is scaled by 100
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Percent(Fraction);

impl Percent {
    pub fn new(
        numerator: impl Into<num_bigint::BigInt>,
        denominator: impl Into<num_bigint::BigInt>,
    ) -> Result<Self, TypesError> {
        Ok(Self(Fraction::new(numerator, denominator)?))
    }

    pub fn as_fraction(&self) -> &Fraction {
        &self.0
    }

    fn scaled(&self) -> Fraction {
        self.0.multiply(&Fraction::from_integer(100))
    }

    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.scaled().to_significant(significant_digits, rounding)
    }

    pub fn to_significant_with(
        &self,
        significant_digits: u32,
        format: &Format,
        rounding: Rounding,
    ) -> Result<String, TypesError> {
        self.scaled()
            .to_significant_with(significant_digits, format, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.scaled().to_fixed(decimal_places, rounding)
    }

    pub fn to_fixed_with(&self, decimal_places: u32, format: &Format, rounding: Rounding) -> String {
        self.scaled().to_fixed_with(decimal_places, format, rounding)
    }
}

impl From<Fraction> for Percent {
    fn from(fraction: Fraction) -> Self {
        Self(fraction)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.to_fixed(2, Rounding::HalfUp))
    }
}
