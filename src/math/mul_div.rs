//! Widening multiply-then-divide.

use alloy_primitives::U256;

use crate::error::AmmError;

/// Computes `floor(a * b / denominator)` with a 256-bit intermediate.
///
/// The product of two `u128` values always fits in 256 bits, so the only
/// failure modes are a zero denominator and a quotient above `u128::MAX`.
///
/// # Errors
///
/// - [`AmmError::DivisionByZero`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use hydra_exchange::math::mul_div;
///
/// let e18 = 10u128.pow(18);
/// // 56e18 * 1e18 / 56e18 never overflows despite the 1e38 product.
/// assert_eq!(mul_div(56 * e18, e18, 56 * e18), Ok(e18));
/// ```
pub fn mul_div(a: u128, b: u128, denominator: u128) -> Result<u128, AmmError> {
    if denominator == 0 {
        return Err(AmmError::DivisionByZero);
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(denominator);
    u128::try_from(quotient).map_err(|_| AmmError::Overflow("mul_div quotient exceeds u128"))
}

/// Full 256-bit product of two `u128` values.
#[must_use]
pub fn wide_mul(a: u128, b: u128) -> U256 {
    U256::from(a) * U256::from(b)
}
