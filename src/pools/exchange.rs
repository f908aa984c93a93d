//! Constant-product pool engine (Uniswap V2 style accounting).
//!
//! The pool never receives amounts as arguments.  Callers move assets (or
//! shares) into the pool's ledger account first; the entry point then
//! derives the deposit as `ledger_balance − reserve` (or reads its own
//! share balance for a burn).
//!
//! # Mint Algorithm
//!
//! 1. `amount_x = balance_x − reserve_x`
//! 2. Mint pending protocol-fee shares (fee on only)
//! 3. First deposit: `liquidity = √(amount_a · amount_b) − MINIMUM_LIQUIDITY`,
//!    with `MINIMUM_LIQUIDITY` locked to the zero address.
//!    Otherwise: `liquidity = min(amount_a · S / reserve_a, amount_b · S / reserve_b)`
//! 4. `reserve_x = balance_x`; `k_last = reserve_a · reserve_b` (fee on)
//!
//! # Burn Algorithm
//!
//! 1. `shares = share_balance(pool)`
//! 2. Mint pending protocol-fee shares (fee on only)
//! 3. `amount_x = shares · balance_x / S`
//! 4. Burn the shares, pay out, `reserve_x = balance_x`, refresh `k_last`
//!
//! # Atomicity
//!
//! Each entry point plans the whole transition from a snapshot taken at
//! the start of the call and only then writes.  Every rejection of the
//! pool's own happens during planning.  A burn whose payout the ledger
//! rejects restores the share book and takes back any leg already paid,
//! so a failed call leaves reserves, shares and `k_last` exactly as they
//! were.

use core::sync::atomic::{AtomicBool, Ordering};

use alloy_primitives::U256;
use parking_lot::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, AssetPair, Liquidity};
use crate::error::AmmError;
use crate::ledger::ShareToken;
use crate::math::{isqrt, mul_div, protocol_fee_shares, wide_mul, CheckedArithmetic};
use crate::traits::{AssetLedger, FeeConfig, FromConfig};

/// Shares permanently locked to the zero address on a pool's first deposit.
pub const MINIMUM_LIQUIDITY: Liquidity = Liquidity::new(1_000);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PoolState {
    reserve_a: Amount,
    reserve_b: Amount,
    k_last: U256,
}

/// What a mint would do, computed without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintPreview {
    /// Units of the first asset counted as deposited.
    pub amount_a: Amount,
    /// Units of the second asset counted as deposited.
    pub amount_b: Amount,
    /// Shares the recipient would receive.
    pub liquidity: Liquidity,
    /// Shares the fee recipient would receive first.
    pub protocol_fee: Liquidity,
    /// Shares that would be locked to the zero address.
    pub locked: Liquidity,
}

/// What a burn would pay out, computed without touching any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnPreview {
    /// Units of the first asset paid out.
    pub amount_a: Amount,
    /// Units of the second asset paid out.
    pub amount_b: Amount,
    /// Shares redeemed.
    pub liquidity: Liquidity,
    /// Shares the fee recipient would receive first.
    pub protocol_fee: Liquidity,
}

/// Clears the re-entry flag when the entry point returns, on every path.
struct EntryGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> EntryGuard<'a> {
    fn acquire(flag: &'a AtomicBool, pool: &Address) -> Result<Self, AmmError> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!(pool = %pool, "re-entrant call rejected");
            return Err(AmmError::Locked);
        }
        Ok(Self { flag })
    }
}

impl Drop for EntryGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// A constant-product pool for one asset pair.
///
/// Created by the [`PairRegistry`](crate::registry::PairRegistry) (or
/// directly via [`FromConfig`]).  The pool owns its reserves, its share
/// book and its fee checkpoint; it reads asset balances from an injected
/// [`AssetLedger`] and the fee switch from an injected [`FeeConfig`].
///
/// # State
///
/// - `reserve_a` / `reserve_b`: last synchronised balances, never above
///   the ledger balances held by [`address`](Self::address)
/// - share book: total supply plus per-holder balances
/// - `k_last`: `reserve_a · reserve_b` after the last fee-on mint or burn
///
/// # Example
///
/// ```rust
/// use hydra_exchange::config::ExchangeConfig;
/// use hydra_exchange::domain::{Address, Amount, AssetPair};
/// use hydra_exchange::ledger::InMemoryLedger;
/// use hydra_exchange::pools::Exchange;
/// use hydra_exchange::traits::{AssetLedger, FromConfig};
///
/// let aave = Address::from_bytes([1u8; 32]);
/// let dai = Address::from_bytes([2u8; 32]);
/// let lp = Address::from_bytes([9u8; 32]);
///
/// let pair = AssetPair::new(aave, dai).expect("distinct");
/// let pool = Exchange::from_config(&ExchangeConfig::new(pair)).expect("pool");
/// let ledger = InMemoryLedger::new();
///
/// ledger.mint(aave, pool.address(), Amount::new(4_000_000)).expect("fund");
/// ledger.mint(dai, pool.address(), Amount::new(9_000_000)).expect("fund");
///
/// let fee_off: Option<Address> = None;
/// let minted = pool.mint(&ledger, &fee_off, lp).expect("mint");
/// assert_eq!(minted.get(), 6_000_000 - 1_000);
/// ```
#[derive(Debug)]
pub struct Exchange {
    address: Address,
    pair: AssetPair,
    minimum_liquidity: Liquidity,
    entered: AtomicBool,
    state: RwLock<PoolState>,
    shares: RwLock<ShareToken>,
}

impl FromConfig<ExchangeConfig> for Exchange {
    /// Creates an empty pool.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ExchangeConfig::validate`].
    fn from_config(config: &ExchangeConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            address: config.pair().pool_address(),
            pair: *config.pair(),
            minimum_liquidity: config.minimum_liquidity(),
            entered: AtomicBool::new(false),
            state: RwLock::new(PoolState::default()),
            shares: RwLock::new(ShareToken::new()),
        })
    }
}

impl Exchange {
    /// The pool's own ledger account.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The canonically ordered asset pair.
    #[must_use]
    pub const fn pair(&self) -> &AssetPair {
        &self.pair
    }

    /// Shares locked on the first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }

    /// Stored reserves in canonical order.
    #[must_use]
    pub fn get_reserves(&self) -> (Amount, Amount) {
        let state = self.state.read();
        (state.reserve_a, state.reserve_b)
    }

    /// Reserve product recorded at the last fee checkpoint; zero when the
    /// protocol fee is off.
    #[must_use]
    pub fn k_last(&self) -> U256 {
        self.state.read().k_last
    }

    /// Total shares in existence.
    #[must_use]
    pub fn total_shares(&self) -> Liquidity {
        self.shares.read().total_supply()
    }

    /// Shares held by `owner`.
    #[must_use]
    pub fn share_balance_of(&self, owner: &Address) -> Liquidity {
        self.shares.read().balance_of(owner)
    }

    /// Shares `spender` may move out of `owner`'s balance.
    #[must_use]
    pub fn share_allowance(&self, owner: &Address, spender: &Address) -> Liquidity {
        self.shares.read().allowance(owner, spender)
    }

    /// Sum of every holder's share balance; equals [`total_shares`](Self::total_shares).
    #[cfg(test)]
    pub(crate) fn sum_of_share_balances(&self) -> u128 {
        self.shares
            .read()
            .holders()
            .fold(0u128, |acc, (_, bal)| acc.saturating_add(bal.get()))
    }

    /// Moves shares between holders.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InsufficientBalance`] if `from` holds too few.
    pub fn transfer_shares(
        &self,
        from: Address,
        to: Address,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        self.shares.write().transfer(from, to, amount)
    }

    /// Lets `spender` move up to `amount` of `owner`'s shares.
    pub fn approve_shares(&self, owner: Address, spender: Address, amount: Liquidity) {
        self.shares.write().approve(owner, spender, amount);
    }

    /// Moves shares on behalf of an approved `spender`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientAllowance`] if the allowance is too small.
    /// - [`AmmError::InsufficientBalance`] if `from` holds too few shares.
    pub fn transfer_shares_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Liquidity,
    ) -> Result<(), AmmError> {
        self.shares.write().transfer_from(spender, from, to, amount)
    }

    /// Computes what [`mint`](Self::mint) would do if `extra_a` and
    /// `extra_b` were added to the pool's current ledger balances.
    ///
    /// Read-only; the router uses it to reject a deposit before any asset
    /// moves.
    ///
    /// # Errors
    ///
    /// Same as [`mint`](Self::mint), except [`AmmError::Locked`].
    pub fn preview_mint(
        &self,
        ledger: &dyn AssetLedger,
        fees: &dyn FeeConfig,
        extra_a: Amount,
        extra_b: Amount,
    ) -> Result<MintPreview, AmmError> {
        let state = *self.state.read();
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        let balance_a = balance_a.safe_add(&extra_a)?;
        let balance_b = balance_b.safe_add(&extra_b)?;
        let supply = self.total_shares();
        self.plan_mint(&state, supply, balance_a, balance_b, fees.fee_to())
    }

    /// Computes what [`burn`](Self::burn) would pay if `extra` shares were
    /// added to the pool's own share balance first.
    ///
    /// # Errors
    ///
    /// Same as [`burn`](Self::burn), except [`AmmError::Locked`].
    pub fn preview_burn(
        &self,
        ledger: &dyn AssetLedger,
        fees: &dyn FeeConfig,
        extra: Liquidity,
    ) -> Result<BurnPreview, AmmError> {
        let state = *self.state.read();
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        let (supply, held) = {
            let shares = self.shares.read();
            (shares.total_supply(), shares.balance_of(&self.address))
        };
        let redeemed = held.safe_add(&extra)?;
        self.plan_burn(&state, supply, redeemed, balance_a, balance_b, fees.fee_to())
    }

    /// Issues shares for the assets transferred in since the last update.
    ///
    /// Returns the shares credited to `to`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::InsufficientInput`] if the first deposit lacks a leg.
    /// - [`AmmError::InsufficientLiquidityMinted`] if no shares would be minted.
    /// - [`AmmError::Underflow`] if the ledger reports less than the reserves.
    /// - [`AmmError::Overflow`] if share supply would exceed `u128`.
    pub fn mint(
        &self,
        ledger: &dyn AssetLedger,
        fees: &dyn FeeConfig,
        to: Address,
    ) -> Result<Liquidity, AmmError> {
        let _guard = EntryGuard::acquire(&self.entered, &self.address)?;

        let state = *self.state.read();
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        let fee_to = fees.fee_to();
        let supply = self.total_shares();
        let plan = self.plan_mint(&state, supply, balance_a, balance_b, fee_to)?;

        {
            let mut shares = self.shares.write();
            if let Some(recipient) = fee_to.filter(|_| !plan.protocol_fee.is_zero()) {
                shares.mint(recipient, plan.protocol_fee)?;
            }
            if !plan.locked.is_zero() {
                shares.mint(Address::ZERO, plan.locked)?;
            }
            shares.mint(to, plan.liquidity)?;
        }
        self.update(balance_a, balance_b, Some(fee_to.is_some()));

        info!(
            pool = %self.address,
            %to,
            amount_a = %plan.amount_a,
            amount_b = %plan.amount_b,
            liquidity = %plan.liquidity,
            "mint"
        );
        Ok(plan.liquidity)
    }

    /// Redeems every share the pool holds in its own share balance.
    ///
    /// Pays `to` its proportional slice of the current ledger balances and
    /// returns the two amounts in canonical order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout is zero,
    ///   including when the pool holds no shares or no shares exist.
    /// - Any error from the ledger's `transfer`.  The redeemed shares go
    ///   back to the pool and a first leg already paid is taken back.
    pub fn burn(
        &self,
        ledger: &dyn AssetLedger,
        fees: &dyn FeeConfig,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let _guard = EntryGuard::acquire(&self.entered, &self.address)?;

        let state = *self.state.read();
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        let fee_to = fees.fee_to();
        let (supply, redeemed) = {
            let shares = self.shares.read();
            (shares.total_supply(), shares.balance_of(&self.address))
        };
        let plan = self.plan_burn(&state, supply, redeemed, balance_a, balance_b, fee_to)?;
        let (amount_a, amount_b) = (plan.amount_a, plan.amount_b);

        let fee_recipient = fee_to.filter(|_| !plan.protocol_fee.is_zero());
        self.settle_burn_shares(fee_recipient, &plan)?;

        if let Err(e) = ledger.transfer(self.pair.first(), self.address, to, amount_a) {
            self.restore_burn_shares(fee_recipient, &plan);
            return Err(e);
        }
        if let Err(e) = ledger.transfer(self.pair.second(), self.address, to, amount_b) {
            if let Err(undo) = ledger.transfer(self.pair.first(), to, self.address, amount_a) {
                error!(pool = %self.address, %to, %amount_a, error = %undo, "first payout not reversed");
            }
            self.restore_burn_shares(fee_recipient, &plan);
            return Err(e);
        }

        let (balance_a, balance_b) = self.ledger_balances(ledger);
        self.update(balance_a, balance_b, Some(fee_to.is_some()));

        info!(
            pool = %self.address,
            %to,
            %amount_a,
            %amount_b,
            liquidity = %redeemed,
            "burn"
        );
        Ok((amount_a, amount_b))
    }

    /// Forces the reserves to match the ledger balances.
    ///
    /// Recovers from assets sent straight to the pool.  Shares and
    /// `k_last` are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Locked`] on re-entry.
    pub fn sync(&self, ledger: &dyn AssetLedger) -> Result<(), AmmError> {
        let _guard = EntryGuard::acquire(&self.entered, &self.address)?;
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        self.update(balance_a, balance_b, None);
        info!(pool = %self.address, reserve_a = %balance_a, reserve_b = %balance_b, "sync");
        Ok(())
    }

    /// Sends any ledger balance above the reserves to `to`.
    ///
    /// The counterpart of [`sync`](Self::sync): instead of absorbing a
    /// donation into the reserves it hands it back out.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Locked`] on re-entry.
    /// - [`AmmError::Underflow`] if the ledger reports less than the reserves.
    /// - Any error from the ledger's `transfer`.
    pub fn skim(&self, ledger: &dyn AssetLedger, to: Address) -> Result<(Amount, Amount), AmmError> {
        let _guard = EntryGuard::acquire(&self.entered, &self.address)?;
        let state = *self.state.read();
        let (balance_a, balance_b) = self.ledger_balances(ledger);
        let excess_a = balance_a.safe_sub(&state.reserve_a)?;
        let excess_b = balance_b.safe_sub(&state.reserve_b)?;
        if !excess_a.is_zero() {
            ledger.transfer(self.pair.first(), self.address, to, excess_a)?;
        }
        if !excess_b.is_zero() {
            ledger.transfer(self.pair.second(), self.address, to, excess_b)?;
        }
        info!(pool = %self.address, %to, %excess_a, %excess_b, "skim");
        Ok((excess_a, excess_b))
    }

    fn ledger_balances(&self, ledger: &dyn AssetLedger) -> (Amount, Amount) {
        (
            ledger.balance_of(self.pair.first(), self.address),
            ledger.balance_of(self.pair.second(), self.address),
        )
    }

    /// Writes new reserves.  `fee_on` of `None` leaves `k_last` untouched;
    /// otherwise it is refreshed (fee on) or cleared (fee off).
    fn update(&self, balance_a: Amount, balance_b: Amount, fee_on: Option<bool>) {
        let mut state = self.state.write();
        state.reserve_a = balance_a;
        state.reserve_b = balance_b;
        match fee_on {
            Some(true) => state.k_last = wide_mul(balance_a.get(), balance_b.get()),
            Some(false) => state.k_last = U256::ZERO,
            None => {}
        }
    }

    /// Mints the protocol fee and destroys the redeemed shares in one write.
    fn settle_burn_shares(
        &self,
        fee_recipient: Option<Address>,
        plan: &BurnPreview,
    ) -> Result<(), AmmError> {
        let mut shares = self.shares.write();
        if let Some(recipient) = fee_recipient {
            shares.mint(recipient, plan.protocol_fee)?;
        }
        if let Err(e) = shares.burn(self.address, plan.liquidity) {
            if let Some(recipient) = fee_recipient {
                shares.burn(recipient, plan.protocol_fee)?;
            }
            return Err(e);
        }
        Ok(())
    }

    /// Undoes [`settle_burn_shares`](Self::settle_burn_shares) after a
    /// rejected payout.
    fn restore_burn_shares(&self, fee_recipient: Option<Address>, plan: &BurnPreview) {
        let mut shares = self.shares.write();
        let restored = shares.mint(self.address, plan.liquidity).and_then(|()| {
            fee_recipient.map_or(Ok(()), |recipient| shares.burn(recipient, plan.protocol_fee))
        });
        match restored {
            Ok(()) => warn!(pool = %self.address, liquidity = %plan.liquidity, "burn payout rejected"),
            Err(e) => error!(pool = %self.address, error = %e, "share book not restored"),
        }
    }

    fn pending_protocol_fee(
        &self,
        state: &PoolState,
        supply: Liquidity,
        fee_to: Option<Address>,
    ) -> Result<Liquidity, AmmError> {
        if fee_to.is_none() {
            return Ok(Liquidity::ZERO);
        }
        let k = wide_mul(state.reserve_a.get(), state.reserve_b.get());
        let owed = protocol_fee_shares(supply, k, state.k_last)?;
        if !owed.is_zero() {
            debug!(pool = %self.address, shares = %owed, "protocol fee accrued");
        }
        Ok(owed)
    }

    fn plan_burn(
        &self,
        state: &PoolState,
        supply: Liquidity,
        redeemed: Liquidity,
        balance_a: Amount,
        balance_b: Amount,
        fee_to: Option<Address>,
    ) -> Result<BurnPreview, AmmError> {
        let protocol_fee = self.pending_protocol_fee(state, supply, fee_to)?;
        let supply = supply.safe_add(&protocol_fee)?;
        if supply.is_zero() || redeemed.is_zero() || redeemed > supply {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        let amount_a = Amount::new(mul_div(redeemed.get(), balance_a.get(), supply.get())?);
        let amount_b = Amount::new(mul_div(redeemed.get(), balance_b.get(), supply.get())?);
        if amount_a.is_zero() || amount_b.is_zero() {
            return Err(AmmError::InsufficientLiquidityBurned);
        }
        Ok(BurnPreview {
            amount_a,
            amount_b,
            liquidity: redeemed,
            protocol_fee,
        })
    }

    fn plan_mint(
        &self,
        state: &PoolState,
        supply: Liquidity,
        balance_a: Amount,
        balance_b: Amount,
        fee_to: Option<Address>,
    ) -> Result<MintPreview, AmmError> {
        let amount_a = balance_a.safe_sub(&state.reserve_a)?;
        let amount_b = balance_b.safe_sub(&state.reserve_b)?;
        if supply.is_zero() && (amount_a.is_zero() || amount_b.is_zero()) {
            return Err(AmmError::InsufficientInput);
        }

        let protocol_fee = self.pending_protocol_fee(state, supply, fee_to)?;
        let supply = supply.safe_add(&protocol_fee)?;

        let (liquidity, locked) = if supply.is_zero() {
            let root = Liquidity::narrow(isqrt(wide_mul(amount_a.get(), amount_b.get())))
                .ok_or(AmmError::Overflow("initial liquidity"))?;
            let liquidity = root
                .checked_sub(&self.minimum_liquidity)
                .ok_or(AmmError::InsufficientLiquidityMinted)?;
            (liquidity, self.minimum_liquidity)
        } else {
            let by_a = mul_div(amount_a.get(), supply.get(), state.reserve_a.get())?;
            let by_b = mul_div(amount_b.get(), supply.get(), state.reserve_b.get())?;
            (Liquidity::new(by_a.min(by_b)), Liquidity::ZERO)
        };
        if liquidity.is_zero() {
            return Err(AmmError::InsufficientLiquidityMinted);
        }
        // Every holder balance is bounded by the supply, so checking the
        // final supply here means the share writes cannot fail.
        supply.safe_add(&locked)?.safe_add(&liquidity)?;

        Ok(MintPreview {
            amount_a,
            amount_b,
            liquidity,
            protocol_fee,
            locked,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;

    const E18: u128 = 1_000_000_000_000_000_000;
    const FEE_OFF: Option<Address> = None;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 32])
    }

    fn aave() -> Address {
        addr(1)
    }

    fn dai() -> Address {
        addr(2)
    }

    fn lp() -> Address {
        addr(10)
    }

    fn fee_sink() -> Address {
        addr(30)
    }

    fn make_pool() -> Exchange {
        let Ok(pair) = AssetPair::new(aave(), dai()) else {
            panic!("valid pair");
        };
        let Ok(pool) = Exchange::from_config(&ExchangeConfig::new(pair)) else {
            panic!("valid pool");
        };
        pool
    }

    fn deposit(ledger: &InMemoryLedger, pool: &Exchange, a: u128, b: u128) {
        let (Ok(()), Ok(())) = (
            ledger.mint(aave(), pool.address(), Amount::new(a)),
            ledger.mint(dai(), pool.address(), Amount::new(b)),
        ) else {
            panic!("fund pool");
        };
    }

    fn seeded(fees: &dyn FeeConfig) -> (InMemoryLedger, Exchange) {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        deposit(&ledger, &pool, E18, 56 * E18);
        let Ok(_) = pool.mint(&ledger, fees, lp()) else {
            panic!("seed mint");
        };
        (ledger, pool)
    }

    // -- first deposit --------------------------------------------------------

    #[test]
    fn first_deposit_locks_minimum_liquidity() {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        deposit(&ledger, &pool, E18, 56 * E18);

        let Ok(minted) = pool.mint(&ledger, &FEE_OFF, lp()) else {
            panic!("expected Ok");
        };
        assert_eq!(minted, Liquidity::new(7_483_314_773_547_882_771 - 1_000));
        assert_eq!(pool.share_balance_of(&Address::ZERO), MINIMUM_LIQUIDITY);
        assert_eq!(pool.total_shares(), Liquidity::new(7_483_314_773_547_882_771));
        assert_eq!(pool.get_reserves(), (Amount::new(E18), Amount::new(56 * E18)));
    }

    #[test]
    fn first_deposit_needs_both_legs() {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        deposit(&ledger, &pool, E18, 0);
        assert_eq!(
            pool.mint(&ledger, &FEE_OFF, lp()),
            Err(AmmError::InsufficientInput)
        );
        assert_eq!(pool.total_shares(), Liquidity::ZERO);
    }

    #[test]
    fn first_deposit_at_minimum_mints_nothing() {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        deposit(&ledger, &pool, 1_000, 1_000);
        assert_eq!(
            pool.mint(&ledger, &FEE_OFF, lp()),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(pool.get_reserves(), (Amount::ZERO, Amount::ZERO));
    }

    // -- subsequent deposits --------------------------------------------------

    #[test]
    fn proportional_deposit_mints_floor_share() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let supply = pool.total_shares().get();
        deposit(&ledger, &pool, E18 / 4, 14 * E18);

        let Ok(minted) = pool.mint(&ledger, &FEE_OFF, lp()) else {
            panic!("expected Ok");
        };
        assert_eq!(minted, Liquidity::new(supply * (E18 / 4) / E18));
        assert_eq!(minted, Liquidity::new(1_870_828_693_386_970_692));
    }

    #[test]
    fn unbalanced_deposit_credits_smaller_leg() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let supply = pool.total_shares().get();
        // B leg is worth twice the A leg at the current price.
        deposit(&ledger, &pool, E18 / 2, 56 * E18);

        let Ok(minted) = pool.mint(&ledger, &FEE_OFF, lp()) else {
            panic!("expected Ok");
        };
        assert_eq!(minted.get(), supply / 2);
        // The surplus B stays in the pool for existing holders.
        assert_eq!(pool.get_reserves().1, Amount::new(112 * E18));
    }

    #[test]
    fn nothing_sent_mints_nothing() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let before = pool.total_shares();
        assert_eq!(
            pool.mint(&ledger, &FEE_OFF, lp()),
            Err(AmmError::InsufficientLiquidityMinted)
        );
        assert_eq!(pool.total_shares(), before);
    }

    // -- burn -----------------------------------------------------------------

    #[test]
    fn burn_without_shares_in_pool() {
        let (ledger, pool) = seeded(&FEE_OFF);
        assert_eq!(
            pool.burn(&ledger, &FEE_OFF, lp()),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    #[test]
    fn burn_on_empty_pool() {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        assert_eq!(
            pool.burn(&ledger, &FEE_OFF, lp()),
            Err(AmmError::InsufficientLiquidityBurned)
        );
    }

    #[test]
    fn burn_pays_proportional_ledger_balances() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let held = pool.share_balance_of(&lp());
        let supply = pool.total_shares().get();
        let Ok(()) = pool.transfer_shares(lp(), pool.address(), held) else {
            panic!("transfer shares");
        };

        let Ok((out_a, out_b)) = pool.burn(&ledger, &FEE_OFF, lp()) else {
            panic!("expected Ok");
        };
        assert_eq!(out_a.get(), held.get() * E18 / supply);
        assert_eq!(out_b, Amount::new(mul_div(held.get(), 56 * E18, supply).unwrap_or(0)));
        assert_eq!(ledger.balance_of(aave(), lp()), out_a);
        assert_eq!(pool.total_shares(), MINIMUM_LIQUIDITY);
        assert_eq!(
            pool.get_reserves(),
            (
                ledger.balance_of(aave(), pool.address()),
                ledger.balance_of(dai(), pool.address())
            )
        );
    }

    #[test]
    fn burn_captures_donations() {
        let (ledger, pool) = seeded(&FEE_OFF);
        deposit(&ledger, &pool, E18, 0);
        let held = pool.share_balance_of(&lp());
        let supply = pool.total_shares().get();
        let Ok(()) = pool.transfer_shares(lp(), pool.address(), held) else {
            panic!("transfer shares");
        };
        let Ok((out_a, _)) = pool.burn(&ledger, &FEE_OFF, lp()) else {
            panic!("expected Ok");
        };
        assert_eq!(out_a.get(), held.get() * (2 * E18) / supply);
    }

    // -- sync / skim ----------------------------------------------------------

    #[test]
    fn sync_absorbs_donation_and_is_idempotent() {
        let (ledger, pool) = seeded(&FEE_OFF);
        deposit(&ledger, &pool, 0, 3 * E18);
        let Ok(()) = pool.sync(&ledger) else {
            panic!("sync");
        };
        let after_first = pool.get_reserves();
        assert_eq!(after_first.1, Amount::new(59 * E18));
        let Ok(()) = pool.sync(&ledger) else {
            panic!("sync");
        };
        assert_eq!(pool.get_reserves(), after_first);
    }

    #[test]
    fn skim_returns_excess() {
        let (ledger, pool) = seeded(&FEE_OFF);
        deposit(&ledger, &pool, 5, 7);
        let Ok((a, b)) = pool.skim(&ledger, addr(50)) else {
            panic!("skim");
        };
        assert_eq!((a, b), (Amount::new(5), Amount::new(7)));
        assert_eq!(ledger.balance_of(dai(), addr(50)), Amount::new(7));
        assert_eq!(pool.get_reserves(), (Amount::new(E18), Amount::new(56 * E18)));
    }

    // -- protocol fee ---------------------------------------------------------

    #[test]
    fn fee_on_records_k_last() {
        let fee_on = Some(fee_sink());
        let (_, pool) = seeded(&fee_on);
        assert_eq!(pool.k_last(), wide_mul(E18, 56 * E18));
    }

    #[test]
    fn fee_off_clears_k_last() {
        let fee_on = Some(fee_sink());
        let (ledger, pool) = seeded(&fee_on);
        deposit(&ledger, &pool, E18, 56 * E18);
        let Ok(_) = pool.mint(&ledger, &FEE_OFF, lp()) else {
            panic!("mint");
        };
        assert_eq!(pool.k_last(), U256::ZERO);
    }

    #[test]
    fn fee_minted_on_growth_before_deposit() {
        let fee_on = Some(fee_sink());
        let (ledger, pool) = seeded(&fee_on);
        // Donation grows √k without new shares.
        deposit(&ledger, &pool, 0, 4 * E18);
        let Ok(()) = pool.sync(&ledger) else {
            panic!("sync");
        };
        deposit(&ledger, &pool, E18, 50 * E18);
        let Ok(minted) = pool.mint(&ledger, &fee_on, lp()) else {
            panic!("mint");
        };
        assert_eq!(minted, Liquidity::new(6_271_538_425_516_392_451));
        assert_eq!(
            pool.share_balance_of(&fee_sink()),
            Liquidity::new(42_531_337_071_788_171)
        );
        assert_eq!(pool.sum_of_share_balances(), pool.total_shares().get());
    }

    #[test]
    fn fee_off_growth_is_not_charged_later() {
        let fee_on = Some(fee_sink());
        let (ledger, pool) = seeded(&FEE_OFF);
        deposit(&ledger, &pool, 0, 4 * E18);
        let Ok(()) = pool.sync(&ledger) else {
            panic!("sync");
        };
        deposit(&ledger, &pool, E18, 60 * E18);
        let Ok(_) = pool.mint(&ledger, &fee_on, lp()) else {
            panic!("mint");
        };
        // k_last was zero, so the growth while off is free.
        assert_eq!(pool.share_balance_of(&fee_sink()), Liquidity::ZERO);
    }

    // -- preview / lock -------------------------------------------------------

    #[test]
    fn preview_matches_mint() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let Ok(preview) = pool.preview_mint(&ledger, &FEE_OFF, Amount::new(E18), Amount::new(E18))
        else {
            panic!("preview");
        };
        deposit(&ledger, &pool, E18, E18);
        let Ok(minted) = pool.mint(&ledger, &FEE_OFF, lp()) else {
            panic!("mint");
        };
        assert_eq!(preview.liquidity, minted);
    }

    #[test]
    fn preview_burn_matches_burn() {
        let (ledger, pool) = seeded(&FEE_OFF);
        let held = pool.share_balance_of(&lp());
        let Ok(preview) = pool.preview_burn(&ledger, &FEE_OFF, held) else {
            panic!("preview");
        };
        let Ok(()) = pool.transfer_shares(lp(), pool.address(), held) else {
            panic!("transfer shares");
        };
        let Ok(paid) = pool.burn(&ledger, &FEE_OFF, lp()) else {
            panic!("burn");
        };
        assert_eq!((preview.amount_a, preview.amount_b), paid);
        assert_eq!(preview.liquidity, held);
    }

    #[test]
    fn guard_rejects_reentry_and_releases() {
        let pool = make_pool();
        let Ok(guard) = EntryGuard::acquire(&pool.entered, &pool.address) else {
            panic!("first acquire");
        };
        assert!(matches!(
            EntryGuard::acquire(&pool.entered, &pool.address),
            Err(AmmError::Locked)
        ));
        drop(guard);
        assert!(EntryGuard::acquire(&pool.entered, &pool.address).is_ok());
    }

    #[test]
    fn locked_pool_rejects_every_entry_point() {
        let ledger = InMemoryLedger::new();
        let pool = make_pool();
        let Ok(_guard) = EntryGuard::acquire(&pool.entered, &pool.address) else {
            panic!("acquire");
        };
        assert_eq!(pool.mint(&ledger, &FEE_OFF, lp()), Err(AmmError::Locked));
        assert_eq!(pool.burn(&ledger, &FEE_OFF, lp()), Err(AmmError::Locked));
        assert_eq!(pool.sync(&ledger), Err(AmmError::Locked));
        assert_eq!(pool.skim(&ledger, lp()), Err(AmmError::Locked));
    }
}
