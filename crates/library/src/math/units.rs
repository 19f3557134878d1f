//! Wad/ray/rad fixed-point helpers.
//!
//! Chain quantities are integers at one of three decimal scales: wad (1e18,
//! token amounts), ray (1e27, rates and ratios) and rad (1e45, debt totals,
//! i.e. wad times ray). Conversions between families are always an explicit
//! call into this module; nothing downstream guesses a scale.

use primitive_types::{U256, U512};

use crate::errors::{MathError, MathResult};

pub fn wad() -> U256 {
    U256::exp10(18)
}

pub fn ray() -> U256 {
    U256::exp10(27)
}

pub fn rad() -> U256 {
    U256::exp10(45)
}

/// `a * b / denominator` with a 512-bit intermediate, rounding down.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let quotient = a.full_mul(b) / U512::from(denominator);
    U256::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// `a * b / denominator` with a 512-bit intermediate, rounding up.
pub fn mul_div_up(a: U256, b: U256, denominator: U256) -> MathResult<U256> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.full_mul(b).div_mod(U512::from(denominator));
    let quotient = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };
    U256::try_from(quotient).map_err(|_| MathError::Overflow)
}

/// Multiply two wad-scale values (or a wad by a dimensionless wad factor).
pub fn wmul(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, b, wad())
}

/// Divide two same-scale values into a wad-scale quotient.
pub fn wdiv(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, wad(), b)
}

/// Scale a value by a ray-scale factor (wad in, wad out).
pub fn rmul(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, b, ray())
}

/// Divide two same-scale values into a ray-scale quotient, or divide a
/// wad by a ray-scale factor (wad in, wad out).
pub fn rdiv(a: U256, b: U256) -> MathResult<U256> {
    mul_div(a, ray(), b)
}

/// `rdiv` rounding up. Used where rounding down would understate an
/// obligation (collateral required to back debt).
pub fn rdiv_up(a: U256, b: U256) -> MathResult<U256> {
    mul_div_up(a, ray(), b)
}

/// Truncate a rad-scale total to its wad-scale magnitude.
pub fn rad_to_wad(a: U256) -> U256 {
    a / ray()
}

/// Ray-scale exponentiation by squaring, rounding down at each step.
/// `rpow(x, 0)` is one ray.
pub fn rpow(x: U256, n: u64) -> MathResult<U256> {
    let mut z = if n % 2 != 0 { x } else { ray() };
    let mut x = x;
    let mut n = n / 2;
    while n != 0 {
        x = rmul(x, x)?;
        if n % 2 != 0 {
            z = rmul(z, x)?;
        }
        n /= 2;
    }
    Ok(z)
}
