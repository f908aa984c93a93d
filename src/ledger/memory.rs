//! Reference in-memory asset ledger.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;
use crate::traits::AssetLedger;

#[derive(Debug, Default)]
struct Book {
    balances: HashMap<(Address, Address), Amount>,
    allowances: HashMap<(Address, Address, Address), Amount>,
}

impl Book {
    fn balance(&self, asset: Address, owner: Address) -> Amount {
        self.balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn move_units(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let debited = self
            .balance(asset, from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let credited = self.balance(asset, to).safe_add(&amount)?;
        self.balances.insert((asset, from), debited);
        self.balances.insert((asset, to), credited);
        Ok(())
    }
}

/// Thread-safe ledger for any number of assets, kept in memory.
///
/// All balances and allowances sit behind one lock, so every operation is
/// atomic and a failed operation leaves the book untouched.  An allowance
/// of [`Amount::MAX`] is treated as unlimited and never decremented.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, Amount};
/// use hydra_exchange::ledger::InMemoryLedger;
/// use hydra_exchange::traits::AssetLedger;
///
/// let dai = Address::from_bytes([2u8; 32]);
/// let alice = Address::from_bytes([10u8; 32]);
/// let bob = Address::from_bytes([11u8; 32]);
///
/// let ledger = InMemoryLedger::new();
/// ledger.mint(dai, alice, Amount::new(100)).expect("mint");
/// ledger.transfer(dai, alice, bob, Amount::new(40)).expect("transfer");
/// assert_eq!(ledger.balance_of(dai, bob), Amount::new(40));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    book: RwLock<Book>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every holder's balance of `asset`.
    #[must_use]
    pub fn total_supply(&self, asset: Address) -> Amount {
        self.book
            .read()
            .balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .fold(Amount::ZERO, |acc, (_, bal)| {
                acc.checked_add(bal).unwrap_or(Amount::MAX)
            })
    }
}

impl AssetLedger for InMemoryLedger {
    fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.book.read().balance(asset, owner)
    }

    fn allowance(&self, asset: Address, owner: Address, spender: Address) -> Amount {
        self.book
            .read()
            .allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn approve(
        &self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.book
            .write()
            .allowances
            .insert((asset, owner, spender), amount);
        trace!(%asset, %owner, %spender, %amount, "approve");
        Ok(())
    }

    fn transfer(
        &self,
        asset: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.book.write().move_units(asset, from, to, amount)?;
        trace!(%asset, %from, %to, %amount, "transfer");
        Ok(())
    }

    fn transfer_from(
        &self,
        asset: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let mut book = self.book.write();
        let key = (asset, from, spender);
        let allowed = book.allowances.get(&key).copied().unwrap_or(Amount::ZERO);
        let remaining = if allowed == Amount::MAX {
            Amount::MAX
        } else {
            allowed
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?
        };
        book.move_units(asset, from, to, amount)?;
        book.allowances.insert(key, remaining);
        trace!(%asset, %spender, %from, %to, %amount, "transfer_from");
        Ok(())
    }

    fn mint(&self, asset: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let mut book = self.book.write();
        let credited = book.balance(asset, to).safe_add(&amount)?;
        book.balances.insert((asset, to), credited);
        trace!(%asset, %to, %amount, "mint");
        Ok(())
    }
}
