//! Growth-based protocol fee.
//!
//! The protocol takes one sixth of the growth in `√k` between two fee
//! events.  Minting `s` new shares against a supply `S` dilutes holders so
//! that the new shares claim exactly that slice:
//!
//! ```text
//! s = S · (√k − √k_last) / (5 · √k + √k_last)
//! ```

use alloy_primitives::U256;

use super::isqrt;
use crate::domain::Liquidity;
use crate::error::AmmError;

/// Denominator weight on `√k`; 5 fixes the protocol take at 1/6.
const ROOT_K_WEIGHT: u8 = 5;

/// Shares owed to the fee recipient for invariant growth since `k_last`.
///
/// `k` and `k_last` are raw reserve products.  Returns zero when there is
/// no growth, when `k_last` is zero (tracking off) or when the supply is
/// zero.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if an intermediate exceeds 256 bits or
/// the result exceeds `u128`.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use hydra_exchange::domain::Liquidity;
/// use hydra_exchange::math::protocol_fee_shares;
///
/// // √k grows from 100 to 121: 1000 · 21 / (605 + 100) = 29
/// let owed = protocol_fee_shares(Liquidity::new(1_000), U256::from(14_641u32), U256::from(10_000u32));
/// assert_eq!(owed, Ok(Liquidity::new(29)));
/// ```
pub fn protocol_fee_shares(
    total_shares: Liquidity,
    k: U256,
    k_last: U256,
) -> Result<Liquidity, AmmError> {
    if k_last.is_zero() || total_shares.is_zero() {
        return Ok(Liquidity::ZERO);
    }
    let root_k = isqrt(k);
    let root_k_last = isqrt(k_last);
    if root_k <= root_k_last {
        return Ok(Liquidity::ZERO);
    }

    let numerator = total_shares
        .widen()
        .checked_mul(root_k - root_k_last)
        .ok_or(AmmError::Overflow("protocol fee numerator"))?;
    let denominator = root_k
        .checked_mul(U256::from(ROOT_K_WEIGHT))
        .and_then(|v| v.checked_add(root_k_last))
        .ok_or(AmmError::Overflow("protocol fee denominator"))?;

    Liquidity::narrow(numerator / denominator).ok_or(AmmError::Overflow("protocol fee shares"))
}
