//! Integer helpers that mirror EVM semantics
//!
//! Pool accounting has to reproduce the deployed contracts bit for bit, so the square
//! root here is the same Babylonian iteration the contracts use and every value is
//! checked against the Solidity type it models.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};
use once_cell::sync::Lazy;

use crate::errors::TypesError;

/// Largest value representable as a Solidity `uint256`
pub static MAX_UINT256: Lazy<BigInt> = Lazy::new(|| (BigInt::one() << 256u32) - 1);

/// Largest value representable as a Solidity `uint8`
pub const MAX_UINT8: u64 = 0xff;

/// Ensure `value` lies in `[0, 2^256 - 1]`
pub fn validate_uint256(value: &BigInt) -> Result<(), TypesError> {
    if value.is_negative() || value > &*MAX_UINT256 {
        return Err(TypesError::NotUint256(value.to_string()));
    }
    Ok(())
}

/// Ensure `value` lies in `[0, 255]`
pub fn validate_uint8(value: &BigInt) -> Result<(), TypesError> {
    if value.is_negative() || value > &BigInt::from(MAX_UINT8) {
        return Err(TypesError::NotUint8(value.to_string()));
    }
    Ok(())
}

/// Floor square root using the Babylonian method from the pool contracts
pub fn sqrt(y: &BigInt) -> Result<BigInt, TypesError> {
    validate_uint256(y)?;

    let three = BigInt::from(3);
    if y > &three {
        let two = BigInt::from(2);
        let mut z = y.clone();
        let mut x: BigInt = y / &two + 1;
        while x < z {
            z = x.clone();
            x = (y / &x + &x) / &two;
        }
        Ok(z)
    } else if !y.is_zero() {
        Ok(BigInt::one())
    } else {
        Ok(BigInt::zero())
    }
}

/// `10^exponent` as a big integer
pub fn pow10(exponent: u32) -> BigInt {
    num_traits::pow(BigInt::from(10), exponent as usize)
}
