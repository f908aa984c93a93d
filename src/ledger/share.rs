//! Per-pool share token bookkeeping.

use std::collections::HashMap;

use crate::domain::{Address, Liquidity};
use crate::error::AmmError;
use crate::math::CheckedArithmetic;

/// Balance book for one pool's share token.
///
/// Invariant: the sum of all balances equals [`total_supply`](Self::total_supply).
/// Every mutating method checks before it writes, so an `Err` leaves the
/// book untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareToken {
    total_supply: Liquidity,
    balances: HashMap<Address, Liquidity>,
    allowances: HashMap<(Address, Address), Liquidity>,
}

impl ShareToken {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total shares in existence.
    #[must_use]
    pub const fn total_supply(&self) -> Liquidity {
        self.total_supply
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn balance_of(&self, owner: &Address) -> Liquidity {
        self.balances.get(owner).copied().unwrap_or(Liquidity::ZERO)
    }

    /// Shares `spender` may move out of `owner`'s balance.
    #[must_use]
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Liquidity {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Liquidity::ZERO)
    }

    /// Iterates over every non-zero holder.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Liquidity)> {
        self.balances.iter().filter(|(_, bal)| !bal.is_zero())
    }

    /// Creates `amount` shares for `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply would exceed `u128`.
    pub fn mint(&mut self, to: Address, amount: Liquidity) -> Result<(), AmmError> {
        let supply = self.total_supply.safe_add(&amount)?;
        // Each balance is bounded by the supply, so this cannot overflow.
        let balance = self.balance_of(&to).safe_add(&amount)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Destroys `amount` of `from`'s shares.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds fewer.
    pub fn burn(&mut self, from: Address, amount: Liquidity) -> Result<(), AmmError> {
        let balance = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        let supply = self.total_supply.safe_sub(&amount)?;
        self.balances.insert(from, balance);
        self.total_supply = supply;
        Ok(())
    }

    /// Moves shares between holders.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds fewer than
    /// `amount`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        let debited = self
            .balance_of(&from)
            .checked_sub(&amount)
            .ok_or(AmmError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let credited = self.balance_of(&to).safe_add(&amount)?;
        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Sets `spender`'s allowance over `owner`'s shares.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Liquidity) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Moves shares on behalf of `spender`, spending its allowance.
    ///
    /// An allowance of [`Liquidity::MAX`] is unlimited and left untouched.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds too few shares.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        let allowed = self.allowance(&from, &spender);
        let remaining = if allowed == Liquidity::MAX {
            Liquidity::MAX
        } else {
            allowed
                .checked_sub(&amount)
                .ok_or(AmmError::InsufficientAllowance)?
        };
        self.transfer(from, to, amount)?;
        self.allowances.insert((from, spender), remaining);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn sum(book: &ShareToken) -> u128 {
        book.holders().map(|(_, l)| l.get()).sum()
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut book = ShareToken::new();
        let Ok(()) = book.mint(addr(1), Liquidity::new(500)) else {
            panic!("mint");
        };
        let Ok(()) = book.mint(Address::ZERO, Liquidity::new(1_000)) else {
            panic!("mint");
        };
        let Ok(()) = book.burn(addr(1), Liquidity::new(200)) else {
            panic!("burn");
        };
        assert_eq!(book.total_supply(), Liquidity::new(1_300));
        assert_eq!(sum(&book), 1_300);
    }

    #[test]
    fn burn_more_than_held() {
        let mut book = ShareToken::new();
        let Ok(()) = book.mint(addr(1), Liquidity::new(5)) else {
            panic!("mint");
        };
        assert_eq!(
            book.burn(addr(1), Liquidity::new(6)),
            Err(AmmError::InsufficientBalance)
        );
        assert_eq!(book.total_supply(), Liquidity::new(5));
    }

    #[test]
    fn transfer_from_requires_allowance() {
        let mut book = ShareToken::new();
        let Ok(()) = book.mint(addr(1), Liquidity::new(100)) else {
            panic!("mint");
        };
        assert_eq!(
            book.transfer_from(addr(9), addr(1), addr(2), Liquidity::new(1)),
            Err(AmmError::InsufficientAllowance)
        );
        book.approve(addr(1), addr(9), Liquidity::new(40));
        let Ok(()) = book.transfer_from(addr(9), addr(1), addr(2), Liquidity::new(30)) else {
            panic!("transfer_from");
        };
        assert_eq!(book.allowance(&addr(1), &addr(9)), Liquidity::new(10));
        assert_eq!(book.balance_of(&addr(2)), Liquidity::new(30));
        assert_eq!(sum(&book), 100);
    }

    #[test]
    fn unlimited_allowance_sticks() {
        let mut book = ShareToken::new();
        let Ok(()) = book.mint(addr(1), Liquidity::new(100)) else {
            panic!("mint");
        };
        book.approve(addr(1), addr(9), Liquidity::MAX);
        let Ok(()) = book.transfer_from(addr(9), addr(1), addr(2), Liquidity::new(100)) else {
            panic!("transfer_from");
        };
        assert_eq!(book.allowance(&addr(1), &addr(9)), Liquidity::MAX);
    }
}
