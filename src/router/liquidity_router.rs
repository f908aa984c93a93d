//! The liquidity router.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::library::{optimal_deposit, oriented_reserves};
use crate::clock::Clock;
use crate::config::ExchangeConfig;
use crate::domain::{
    AddedLiquidity, Address, Amount, AssetPair, DepositRequest, Liquidity, RemovedLiquidity,
    WithdrawRequest,
};
use crate::error::AmmError;
use crate::pools::Exchange;
use crate::registry::PairRegistry;
use crate::traits::{AssetLedger, FromConfig};

/// Stateless front end for depositing into and withdrawing from pools.
///
/// The router sizes deposits to the pool ratio, enforces slippage floors
/// and deadlines, and moves the caller's assets (or shares) into the pool
/// before calling [`Exchange::mint`] / [`Exchange::burn`].  It moves
/// them as an approved spender, so callers approve the router's
/// [`address`](Self::address) on the ledger (for deposits) or on the pool's
/// share book (for withdrawals) first.
///
/// Every check, including a dry run of the pool call, happens before the
/// first transfer: a rejected request moves nothing and creates no pool.
/// If the ledger still fails a later transfer, the legs already moved are
/// sent back before the error is returned.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
///
/// use hydra_exchange::clock::ManualClock;
/// use hydra_exchange::config::ProtocolConfig;
/// use hydra_exchange::domain::{Address, Amount, DepositRequest};
/// use hydra_exchange::ledger::InMemoryLedger;
/// use hydra_exchange::registry::PairRegistry;
/// use hydra_exchange::router::Router;
/// use hydra_exchange::traits::{AssetLedger, FromConfig};
///
/// let admin = Address::from_bytes([0xAAu8; 32]);
/// let aave = Address::from_bytes([1u8; 32]);
/// let dai = Address::from_bytes([2u8; 32]);
/// let alice = Address::from_bytes([9u8; 32]);
/// let router_addr = Address::from_bytes([0xEEu8; 32]);
///
/// let registry = Arc::new(PairRegistry::from_config(&ProtocolConfig::new(admin).expect("cfg")).expect("registry"));
/// let ledger = Arc::new(InMemoryLedger::new());
/// let router = Router::new(router_addr, Arc::clone(&registry), Arc::clone(&ledger), ManualClock::new(0));
///
/// for asset in [aave, dai] {
///     ledger.mint(asset, alice, Amount::new(1_000_000)).expect("fund");
///     ledger.approve(asset, alice, router_addr, Amount::MAX).expect("approve");
/// }
///
/// let req = DepositRequest::new(aave, dai, alice, 10)
///     .desired(Amount::new(40_000), Amount::new(90_000));
/// let added = router.deposit_liquidity(alice, &req).expect("deposit");
/// assert_eq!(added.liquidity.get(), 60_000 - 1_000);
/// ```
#[derive(Debug)]
pub struct Router<L, C> {
    address: Address,
    registry: Arc<PairRegistry>,
    ledger: Arc<L>,
    clock: C,
}

impl<L: AssetLedger, C: Clock> Router<L, C> {
    /// Creates a router acting as spender `address`.
    #[must_use]
    pub const fn new(address: Address, registry: Arc<PairRegistry>, ledger: Arc<L>, clock: C) -> Self {
        Self {
            address,
            registry,
            ledger,
            clock,
        }
    }

    /// The account callers approve as spender.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The registry pools are looked up in.
    #[must_use]
    pub fn registry(&self) -> &Arc<PairRegistry> {
        &self.registry
    }

    /// The asset ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// The time source used for deadlines.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Deposits both assets at the pool ratio and mints shares to
    /// `request.recipient`.
    ///
    /// The pool is created if the pair has none.  Amounts in the result
    /// follow the request's asset order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the clock is past `request.deadline`.
    /// - [`AmmError::IdenticalAddresses`] / [`AmmError::ZeroAddress`] for
    ///   an invalid pair.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the sized deposit is below a floor.
    /// - [`AmmError::InsufficientBalance`] / [`AmmError::InsufficientAllowance`]
    ///   if `caller` cannot fund a leg.
    /// - Any error from the ledger's `transfer_from` or [`Exchange::mint`];
    ///   legs already in the pool are refunded to `caller`.
    pub fn deposit_liquidity(
        &self,
        caller: Address,
        request: &DepositRequest,
    ) -> Result<AddedLiquidity, AmmError> {
        self.ensure_live(request.deadline)?;
        let pair = AssetPair::new(request.asset_a, request.asset_b)?;

        let existing = self.registry.get_pair(request.asset_a, request.asset_b);
        let pool = match &existing {
            Some(pool) => Arc::clone(pool),
            // Detached stand-in at the same address, used for the dry run.
            None => Arc::new(Exchange::from_config(
                &ExchangeConfig::new(pair)
                    .with_minimum_liquidity(self.registry.minimum_liquidity())?,
            )?),
        };

        let (reserve_a, reserve_b) = oriented_reserves(&pool, &request.asset_a);
        let (amount_a, amount_b) = optimal_deposit(
            request.amount_a_desired,
            request.amount_b_desired,
            request.amount_a_min,
            request.amount_b_min,
            reserve_a,
            reserve_b,
        )?;

        self.ensure_fundable(request.asset_a, caller, amount_a)?;
        self.ensure_fundable(request.asset_b, caller, amount_b)?;
        let (extra_first, extra_second) = if pair.is_first(&request.asset_a) {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        let preview = pool.preview_mint(
            &*self.ledger,
            &*self.registry,
            extra_first,
            extra_second,
        )?;
        debug!(
            pool = %pool.address(),
            %amount_a,
            %amount_b,
            liquidity = %preview.liquidity,
            "deposit sized"
        );

        let pool = match existing {
            Some(pool) => pool,
            None => match self.registry.create_pair(request.asset_a, request.asset_b) {
                Ok(pool) => pool,
                // Lost a creation race; use the winner's pool.
                Err(AmmError::PairExists) => self
                    .registry
                    .get_pair(request.asset_a, request.asset_b)
                    .ok_or(AmmError::PairNotFound)?,
                Err(e) => return Err(e),
            },
        };

        let ledger = &*self.ledger;
        ledger.transfer_from(request.asset_a, self.address, caller, pool.address(), amount_a)?;
        if let Err(e) =
            ledger.transfer_from(request.asset_b, self.address, caller, pool.address(), amount_b)
        {
            self.refund(&pool, caller, &[(request.asset_a, amount_a)]);
            return Err(e);
        }
        let liquidity = match pool.mint(ledger, &*self.registry, request.recipient) {
            Ok(liquidity) => liquidity,
            Err(e) => {
                self.refund(
                    &pool,
                    caller,
                    &[(request.asset_a, amount_a), (request.asset_b, amount_b)],
                );
                return Err(e);
            }
        };

        info!(
            pool = %pool.address(),
            %caller,
            recipient = %request.recipient,
            %amount_a,
            %amount_b,
            %liquidity,
            "liquidity added"
        );
        Ok(AddedLiquidity {
            amount_a,
            amount_b,
            liquidity,
        })
    }

    /// Redeems `request.liquidity` of `caller`'s shares and pays both
    /// assets to `request.recipient`.
    ///
    /// Amounts in the result follow the request's asset order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the clock is past `request.deadline`.
    /// - [`AmmError::PairNotFound`] if the pair has no pool.
    /// - [`AmmError::InsufficientBalance`] / [`AmmError::InsufficientAllowance`]
    ///   if `caller` cannot hand over the shares.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if a payout is below its floor.
    /// - Any error from [`Exchange::burn`]; the shares and the router's
    ///   allowance are handed back to `caller`.
    pub fn withdraw_liquidity(
        &self,
        caller: Address,
        request: &WithdrawRequest,
    ) -> Result<RemovedLiquidity, AmmError> {
        self.ensure_live(request.deadline)?;
        let pool = self
            .registry
            .get_pair(request.asset_a, request.asset_b)
            .ok_or(AmmError::PairNotFound)?;

        if pool.share_balance_of(&caller) < request.liquidity {
            return Err(AmmError::InsufficientBalance);
        }
        let allowed = pool.share_allowance(&caller, &self.address);
        if allowed != Liquidity::MAX && allowed < request.liquidity {
            return Err(AmmError::InsufficientAllowance);
        }
        let preview = pool.preview_burn(
            &*self.ledger,
            &*self.registry,
            request.liquidity,
        )?;
        self.ensure_floors(&pool, request, preview.amount_a, preview.amount_b)?;

        pool.transfer_shares_from(self.address, caller, pool.address(), request.liquidity)?;
        let (paid_first, paid_second) =
            match pool.burn(&*self.ledger, &*self.registry, request.recipient) {
                Ok(paid) => paid,
                Err(e) => {
                    self.return_shares(&pool, caller, request.liquidity, allowed);
                    return Err(e);
                }
            };
        let (amount_a, amount_b) =
            self.ensure_floors(&pool, request, paid_first, paid_second)?;

        info!(
            pool = %pool.address(),
            %caller,
            recipient = %request.recipient,
            liquidity = %request.liquidity,
            %amount_a,
            %amount_b,
            "liquidity removed"
        );
        Ok(RemovedLiquidity { amount_a, amount_b })
    }

    /// Sends deposit legs parked in `pool` back to `caller`.
    fn refund(&self, pool: &Exchange, caller: Address, legs: &[(Address, Amount)]) {
        for &(asset, amount) in legs {
            match self.ledger.transfer(asset, pool.address(), caller, amount) {
                Ok(()) => warn!(pool = %pool.address(), %caller, %asset, %amount, "deposit leg refunded"),
                Err(e) => error!(
                    pool = %pool.address(),
                    %caller,
                    %asset,
                    %amount,
                    error = %e,
                    "deposit leg not refunded"
                ),
            }
        }
    }

    /// Hands shares parked for a failed burn back to `caller` and restores
    /// the router's allowance.
    fn return_shares(&self, pool: &Exchange, caller: Address, liquidity: Liquidity, allowed: Liquidity) {
        if let Err(e) = pool.transfer_shares(pool.address(), caller, liquidity) {
            error!(pool = %pool.address(), %caller, %liquidity, error = %e, "shares not returned");
            return;
        }
        pool.approve_shares(caller, self.address, allowed);
        warn!(pool = %pool.address(), %caller, %liquidity, "withdrawal unwound");
    }

    fn ensure_live(&self, deadline: u64) -> Result<(), AmmError> {
        let now = self.clock.now();
        if now > deadline {
            debug!(now, deadline, "request expired");
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    fn ensure_fundable(&self, asset: Address, caller: Address, amount: Amount) -> Result<(), AmmError> {
        if self.ledger.balance_of(asset, caller) < amount {
            return Err(AmmError::InsufficientBalance);
        }
        let allowed = self.ledger.allowance(asset, caller, self.address);
        if allowed != Amount::MAX && allowed < amount {
            return Err(AmmError::InsufficientAllowance);
        }
        Ok(())
    }

    /// Orients canonical payouts to the request and checks the floors.
    fn ensure_floors(
        &self,
        pool: &Exchange,
        request: &WithdrawRequest,
        paid_first: Amount,
        paid_second: Amount,
    ) -> Result<(Amount, Amount), AmmError> {
        let (amount_a, amount_b) = if pool.pair().is_first(&request.asset_a) {
            (paid_first, paid_second)
        } else {
            (paid_second, paid_first)
        };
        if amount_a < request.amount_a_min {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < request.amount_b_min {
            return Err(AmmError::InsufficientBAmount);
        }
        Ok((amount_a, amount_b))
    }
}
