//! Exact integer square root over 256-bit values.

use alloy_primitives::U256;

/// Integer square root via Newton's method: the largest `r` with `r² ≤ n`.
///
/// Exact for every input; no floating point is involved, so the result can
/// feed further share accounting directly.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use hydra_exchange::math::isqrt;
///
/// assert_eq!(isqrt(U256::from(15u8)), U256::from(3u8));
/// assert_eq!(isqrt(U256::from(16u8)), U256::from(4u8));
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    let mut x = n;
    // ceil(n / 2) keeps the first step from overflowing at U256::MAX.
    let mut y = (n >> 1) + (n & U256::from(1u8));
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}
