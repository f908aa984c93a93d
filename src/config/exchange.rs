//! Configuration for a single pool.

use crate::domain::{AssetPair, Liquidity};
use crate::error::AmmError;
use crate::pools::MINIMUM_LIQUIDITY;

/// Immutable parameters of one [`Exchange`](crate::pools::Exchange).
///
/// # Derived Values
///
/// - Pool address: [`AssetPair::pool_address`]
///
/// # Validation
///
/// - `minimum_liquidity` must be non-zero; it is what keeps the share
///   supply above zero once a pool has been seeded.
/// - The pair is validated at [`AssetPair`] construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeConfig {
    pair: AssetPair,
    minimum_liquidity: Liquidity,
}

impl ExchangeConfig {
    /// Creates a config with the standard minimum liquidity.
    #[must_use]
    pub const fn new(pair: AssetPair) -> Self {
        Self {
            pair,
            minimum_liquidity: MINIMUM_LIQUIDITY,
        }
    }

    /// Overrides the shares locked on the first deposit.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `minimum_liquidity` is zero.
    pub fn with_minimum_liquidity(mut self, minimum_liquidity: Liquidity) -> Result<Self, AmmError> {
        self.minimum_liquidity = minimum_liquidity;
        self.validate()?;
        Ok(self)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `minimum_liquidity` is zero.
    pub const fn validate(&self) -> Result<(), AmmError> {
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum liquidity must be positive",
            ));
        }
        Ok(())
    }

    /// The asset pair.
    #[must_use]
    pub const fn pair(&self) -> &AssetPair {
        &self.pair
    }

    /// Shares locked to the burn address on the first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }
}
