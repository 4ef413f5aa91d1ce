//! Fixed-point scales and overflow-checked arithmetic.
//!
//! Grounded on `common/math/src/math.rs`'s `mul_half_up`/`div_half_up`:
//! same discipline of "multiply fully before dividing" to preserve
//! precision, restated over [`primitive_types::U256`] instead of the
//! settlement runtime's `ManagedDecimal`. spec.md §3 requires truncating
//! (floor) division rather than the teacher's half-up rounding, so
//! [`mul_div`] truncates — U256's native integer division already does
//! this, it is written out explicitly here so the rounding rule is a
//! reviewable one-liner rather than an implicit float.

use primitive_types::U256;

use crate::error::LendingError;

/// Ray: 27-decimal fixed point, used for rates and interest indices.
pub fn ray() -> U256 {
    U256::exp10(27)
}

/// Wad: 18-decimal fixed point, used for USD prices and the health factor.
pub fn wad() -> U256 {
    U256::exp10(18)
}

/// Bps: basis points, used for risk parameters (LTV, threshold, bonus).
pub const BPS: u32 = 10_000;

pub fn bps() -> U256 {
    U256::from(BPS)
}

/// `a * b / denom`, truncating toward zero, with the multiplication
/// performed in full 512-bit-equivalent precision before the divide.
/// Fails on overflow of `a * b` or on `denom == 0`.
pub fn mul_div(a: U256, b: U256, denom: U256) -> Result<U256, LendingError> {
    if denom.is_zero() {
        return Err(LendingError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(LendingError::ArithmeticOverflow)?;
    Ok(product / denom)
}

/// `a * RAY / b`, i.e. expresses `a` as a ray-scaled fraction of `b`.
pub fn to_ray_fraction(a: U256, b: U256) -> Result<U256, LendingError> {
    mul_div(a, ray(), b)
}

/// Largest representable health factor, used to express "no debt ⇒ +∞"
/// (spec.md §4.4) without an actual infinity value.
pub fn saturating_max() -> U256 {
    U256::MAX
}

pub fn checked_add(a: U256, b: U256) -> Result<U256, LendingError> {
    a.checked_add(b).ok_or(LendingError::ArithmeticOverflow)
}

pub fn checked_sub(a: U256, b: U256) -> Result<U256, LendingError> {
    a.checked_sub(b).ok_or(LendingError::ArithmeticUnderflow)
}
