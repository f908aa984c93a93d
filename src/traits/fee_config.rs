//! Protocol fee switch read by pools on every mint and burn.

use crate::domain::Address;

/// Source of the protocol fee recipient.
///
/// The [`PairRegistry`](crate::registry::PairRegistry) is the production
/// implementor.  `Option<Address>` implements the trait as a fixed switch,
/// which lets a pool be exercised without a registry.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Address;
/// use hydra_exchange::traits::FeeConfig;
///
/// let off: Option<Address> = None;
/// assert!(off.fee_to().is_none());
///
/// let on = Some(Address::from_bytes([7u8; 32]));
/// assert_eq!(on.fee_to(), Some(Address::from_bytes([7u8; 32])));
/// ```
pub trait FeeConfig: Send + Sync {
    /// The current fee recipient, or `None` when the protocol fee is off.
    #[must_use]
    fn fee_to(&self) -> Option<Address>;
}

impl FeeConfig for Option<Address> {
    fn fee_to(&self) -> Option<Address> {
        self.filter(|addr| !addr.is_zero())
    }
}
