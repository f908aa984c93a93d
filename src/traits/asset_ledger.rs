//! Fungible asset ledger consumed by pools and the router.
//!
//! The exchange never owns asset balances itself.  Pools read their own
//! balance from the ledger and move assets out through it; the router
//! moves the caller's assets in through the allowance path.
//!
//! # Consistency Contract
//!
//! Every method is atomic and immediately consistent: a `transfer` that
//! returns `Ok` is visible to the next `balance_of` from the same caller.
//! A failing method must leave the ledger unchanged.
//!
//! # Reentrancy
//!
//! Implementations are untrusted.  A ledger may call back into a pool
//! from inside `transfer`; pools defend themselves with a re-entry flag
//! and the callback sees [`AmmError::Locked`](crate::error::AmmError::Locked).

use crate::domain::{Address, Amount};
use crate::error::AmmError;

/// Balance and allowance bookkeeping for any number of assets.
///
/// Methods take `&self`: ledgers are shared between every pool, the
/// router and the callers, so implementations carry their own interior
/// synchronisation.
pub trait AssetLedger: Send + Sync {
    /// Units of `asset` held by `owner`.
    #[must_use]
    fn balance_of(&self, asset: Address, owner: Address) -> Amount;

    /// Units of `asset` that `spender` may move out of `owner`'s balance.
    #[must_use]
    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Amount;

    /// Sets `spender`'s allowance over `owner`'s `asset`.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the reference ledger never fails.
    fn approve(
        &self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Moves `amount` of `asset` from `from` to `to` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if `spender` is not approved
    ///   for `amount`.
    /// - [`AmmError::InsufficientBalance`] if `from` holds less than `amount`.
    fn transfer_from(
        &self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError>;

    /// Creates `amount` new units of `asset` for `to`.
    ///
    /// Used for bootstrapping balances; the exchange itself never mints
    /// underlying assets.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Overflow`] if the balance would exceed `u128`.
    fn mint(&self, asset: Address, to: Address, amount: Amount) -> Result<(), AmmError>;
}
