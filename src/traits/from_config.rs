//! Generic construction trait for configuration-driven instantiation.
//!
//! [`FromConfig`] gives the registry and the pools a uniform way to be
//! built from their configuration structs:
//!
//! ```text
//! ProtocolConfig  => PairRegistry::from_config(&cfg)
//! ExchangeConfig  => Exchange::from_config(&cfg)
//! ```
//!
//! # Validation Contract
//!
//! Implementations **must** validate the configuration during
//! construction.  A successfully constructed value is in a valid initial
//! state: distinct, non-zero pair assets, a positive minimum liquidity,
//! non-zero fee recipients.
//!
//! There is no blanket implementation; each pairing is explicit.

use crate::error::AmmError;

/// Builds `Self` from a validated configuration `C`.
///
/// # Errors
///
/// Returns [`AmmError::InvalidConfiguration`] (or a more specific
/// variant) if the configuration is invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from the given configuration.
    ///
    /// # Errors
    ///
    /// Propagates the configuration's validation error.
    fn from_config(config: &C) -> Result<Self, AmmError>
    where
        Self: Sized;
}
