//! Registry-wide configuration.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Liquidity};
use crate::error::AmmError;
use crate::pools::MINIMUM_LIQUIDITY;

const fn default_minimum_liquidity() -> Liquidity {
    MINIMUM_LIQUIDITY
}

/// Parameters of a [`PairRegistry`](crate::registry::PairRegistry).
///
/// # Example document
///
/// ```toml
/// fee_to_setter = "0x0101010101010101010101010101010101010101010101010101010101010101"
/// # fee_to is optional; omit it to start with the protocol fee off
/// fee_to = "0x0202020202020202020202020202020202020202020202020202020202020202"
/// minimum_liquidity = 1000
/// ```
///
/// # Validation
///
/// - `fee_to_setter` must not be the zero address.
/// - `fee_to`, when present, must not be the zero address.
/// - `minimum_liquidity` must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProtocolConfig {
    /// The only account allowed to change the fee recipient.
    pub fee_to_setter: Address,
    /// Initial fee recipient; `None` starts with the protocol fee off.
    #[serde(default)]
    pub fee_to: Option<Address>,
    /// Shares locked to the burn address on each pool's first deposit.
    #[serde(default = "default_minimum_liquidity")]
    pub minimum_liquidity: Liquidity,
}

impl ProtocolConfig {
    /// Creates a config with the fee off and the standard minimum liquidity.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::ZeroAddress`] if `fee_to_setter` is zero.
    pub fn new(fee_to_setter: Address) -> Result<Self, AmmError> {
        let config = Self {
            fee_to_setter,
            fee_to: None,
            minimum_liquidity: MINIMUM_LIQUIDITY,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ZeroAddress`] for a zero setter or recipient.
    /// - [`AmmError::InvalidConfiguration`] for a zero minimum liquidity.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.fee_to_setter.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        if self.fee_to.is_some_and(|addr| addr.is_zero()) {
            return Err(AmmError::ZeroAddress);
        }
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum liquidity must be positive",
            ));
        }
        Ok(())
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// - [`AmmError::ConfigParse`] if the document is malformed.
    /// - Any error from [`validate`](Self::validate).
    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(document: &str) -> Result<Self, AmmError> {
        let config: Self =
            toml::from_str(document).map_err(|e| AmmError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
