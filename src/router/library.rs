//! Pure sizing helpers shared by the router and its callers.

use tracing::debug;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::mul_div;
use crate::pools::Exchange;

/// Orders two assets the way pools store them.
///
/// # Errors
///
/// - [`AmmError::IdenticalAddresses`] if `asset_a == asset_b`.
/// - [`AmmError::ZeroAddress`] if the lower address is zero.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Address;
/// use hydra_exchange::router::sort_assets;
///
/// let lo = Address::from_bytes([1u8; 32]);
/// let hi = Address::from_bytes([2u8; 32]);
/// assert_eq!(sort_assets(hi, lo), Ok((lo, hi)));
/// ```
pub fn sort_assets(asset_a: Address, asset_b: Address) -> Result<(Address, Address), AmmError> {
    if asset_a == asset_b {
        return Err(AmmError::IdenticalAddresses);
    }
    let (lo, hi) = if asset_a < asset_b {
        (asset_a, asset_b)
    } else {
        (asset_b, asset_a)
    };
    if lo.is_zero() {
        return Err(AmmError::ZeroAddress);
    }
    Ok((lo, hi))
}

/// Amount of B worth `amount_a` of A at the ratio `reserve_b / reserve_a`.
///
/// Floors.  No fee is applied: this is a pure ratio, not a trade quote.
///
/// # Errors
///
/// - [`AmmError::InsufficientAmount`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if the result exceeds `u128`.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Amount;
/// use hydra_exchange::router::quote;
///
/// let b = quote(Amount::new(10), Amount::new(1), Amount::new(56));
/// assert_eq!(b, Ok(Amount::new(560)));
/// ```
pub fn quote(amount_a: Amount, reserve_a: Amount, reserve_b: Amount) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientAmount);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    mul_div(amount_a.get(), reserve_b.get(), reserve_a.get()).map(Amount::new)
}

/// Picks the largest deposit within the desired amounts that matches the
/// pool ratio.
///
/// With both reserves empty the desired amounts are taken as-is.
/// Otherwise the full `desired_a` is tried first and the full `desired_b`
/// second; the first candidate whose other leg fits wins.
///
/// # Errors
///
/// - [`AmmError::InsufficientBAmount`] if the first candidate fits but
///   its B leg is below `min_b`.
/// - [`AmmError::InsufficientAAmount`] if the second candidate's A leg is
///   below `min_a`.
/// - Any error from [`quote`], e.g. a zero desired amount against a
///   seeded pool.
pub fn optimal_deposit(
    desired_a: Amount,
    desired_b: Amount,
    min_a: Amount,
    min_b: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<(Amount, Amount), AmmError> {
    if reserve_a.is_zero() && reserve_b.is_zero() {
        return Ok((desired_a, desired_b));
    }

    let b_optimal = quote(desired_a, reserve_a, reserve_b)?;
    if b_optimal <= desired_b {
        if b_optimal < min_b {
            return Err(AmmError::InsufficientBAmount);
        }
        debug!(%desired_a, %b_optimal, "deposit sized by A");
        return Ok((desired_a, b_optimal));
    }

    let a_optimal = quote(desired_b, reserve_b, reserve_a)?;
    // b_optimal > desired_b implies a_optimal <= desired_a.
    if a_optimal > desired_a {
        return Err(AmmError::InsufficientAAmount);
    }
    if a_optimal < min_a {
        return Err(AmmError::InsufficientAAmount);
    }
    debug!(%a_optimal, %desired_b, "deposit sized by B");
    Ok((a_optimal, desired_b))
}

/// The pool's reserves in the order `(asset_a, other)`.
#[must_use]
pub fn oriented_reserves(pool: &Exchange, asset_a: &Address) -> (Amount, Amount) {
    let (reserve_first, reserve_second) = pool.get_reserves();
    if pool.pair().is_first(asset_a) {
        (reserve_first, reserve_second)
    } else {
        (reserve_second, reserve_first)
    }
}
