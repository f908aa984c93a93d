//! Canonically ordered pair of distinct assets.

use alloy_primitives::keccak256;

use super::Address;
use crate::error::AmmError;

/// An ordered pair of distinct asset addresses.
///
/// The canonical ordering guarantees `first() < second()`, so `(A, B)` and
/// `(B, A)` name the same pair and can never produce two pools.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, AssetPair};
///
/// let aave = Address::from_bytes([1u8; 32]);
/// let dai = Address::from_bytes([2u8; 32]);
///
/// let pair = AssetPair::new(dai, aave).expect("distinct assets");
/// assert_eq!(pair.first(), aave);
/// assert_eq!(pair.second(), dai);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetPair {
    asset_a: Address,
    asset_b: Address,
}

impl AssetPair {
    /// Creates a new canonically ordered pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if both addresses are equal.
    /// - [`AmmError::ZeroAddress`] if either address is the burn address.
    pub fn new(asset1: Address, asset2: Address) -> Result<Self, AmmError> {
        if asset1 == asset2 {
            return Err(AmmError::IdenticalAddresses);
        }
        let (asset_a, asset_b) = if asset1 < asset2 {
            (asset1, asset2)
        } else {
            (asset2, asset1)
        };
        // Sorted, so only the lower one can be zero.
        if asset_a.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self { asset_a, asset_b })
    }

    /// Returns the lower-address asset.
    #[must_use]
    pub const fn first(&self) -> Address {
        self.asset_a
    }

    /// Returns the higher-address asset.
    #[must_use]
    pub const fn second(&self) -> Address {
        self.asset_b
    }

    /// Returns `true` if `asset` belongs to this pair.
    #[must_use]
    pub fn contains(&self, asset: &Address) -> bool {
        self.asset_a == *asset || self.asset_b == *asset
    }

    /// Returns `true` if `asset` is the pair's first (lower) asset.
    ///
    /// Used to orient reserves to a caller's argument order.
    #[must_use]
    pub fn is_first(&self, asset: &Address) -> bool {
        self.asset_a == *asset
    }

    /// Deterministic pool address: `keccak256(first ‖ second)`.
    #[must_use]
    pub fn pool_address(&self) -> Address {
        let mut preimage = [0u8; 64];
        let (lo, hi) = preimage.split_at_mut(32);
        lo.copy_from_slice(&self.asset_a.as_bytes());
        hi.copy_from_slice(&self.asset_b.as_bytes());
        Address::from_bytes(keccak256(preimage).0)
    }
}
