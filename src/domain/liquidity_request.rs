//! Caller intents handed to the router.

use super::{Address, Amount, Liquidity};

/// A request to deposit two assets into the pool for `asset_a`/`asset_b`.
///
/// The router deposits at most the desired amounts and at least the
/// minimums, at the pool's current ratio.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::{Address, Amount, DepositRequest};
///
/// let aave = Address::from_bytes([1u8; 32]);
/// let dai = Address::from_bytes([2u8; 32]);
/// let lp = Address::from_bytes([9u8; 32]);
///
/// let req = DepositRequest::new(aave, dai, lp, 1_700_000_000)
///     .desired(Amount::ONE, Amount::new(56 * Amount::ONE.get()))
///     .minimum(Amount::new(99 * Amount::ONE.get() / 100), Amount::ZERO);
/// assert_eq!(req.amount_a_desired, Amount::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositRequest {
    /// First asset in the caller's order.
    pub asset_a: Address,
    /// Second asset in the caller's order.
    pub asset_b: Address,
    /// Upper bound on asset A deposited.
    pub amount_a_desired: Amount,
    /// Upper bound on asset B deposited.
    pub amount_b_desired: Amount,
    /// Lower bound on asset A deposited.
    pub amount_a_min: Amount,
    /// Lower bound on asset B deposited.
    pub amount_b_min: Amount,
    /// Receiver of the minted shares.
    pub recipient: Address,
    /// Unix timestamp (seconds) after which the request is rejected.
    pub deadline: u64,
}

impl DepositRequest {
    /// Starts a request with zero amounts.
    #[must_use]
    pub const fn new(asset_a: Address, asset_b: Address, recipient: Address, deadline: u64) -> Self {
        Self {
            asset_a,
            asset_b,
            amount_a_desired: Amount::ZERO,
            amount_b_desired: Amount::ZERO,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            recipient,
            deadline,
        }
    }

    /// Sets the desired amounts.
    #[must_use]
    pub const fn desired(mut self, amount_a: Amount, amount_b: Amount) -> Self {
        self.amount_a_desired = amount_a;
        self.amount_b_desired = amount_b;
        self
    }

    /// Sets the slippage floors.
    #[must_use]
    pub const fn minimum(mut self, amount_a: Amount, amount_b: Amount) -> Self {
        self.amount_a_min = amount_a;
        self.amount_b_min = amount_b;
        self
    }
}

/// A request to redeem `liquidity` shares of the `asset_a`/`asset_b` pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WithdrawRequest {
    /// First asset in the caller's order.
    pub asset_a: Address,
    /// Second asset in the caller's order.
    pub asset_b: Address,
    /// Shares to redeem.
    pub liquidity: Liquidity,
    /// Lower bound on asset A paid out.
    pub amount_a_min: Amount,
    /// Lower bound on asset B paid out.
    pub amount_b_min: Amount,
    /// Receiver of the two assets.
    pub recipient: Address,
    /// Unix timestamp (seconds) after which the request is rejected.
    pub deadline: u64,
}

impl WithdrawRequest {
    /// Starts a request with no slippage floor.
    #[must_use]
    pub const fn new(
        asset_a: Address,
        asset_b: Address,
        liquidity: Liquidity,
        recipient: Address,
        deadline: u64,
    ) -> Self {
        Self {
            asset_a,
            asset_b,
            liquidity,
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            recipient,
            deadline,
        }
    }

    /// Sets the slippage floors.
    #[must_use]
    pub const fn minimum(mut self, amount_a: Amount, amount_b: Amount) -> Self {
        self.amount_a_min = amount_a;
        self.amount_b_min = amount_b;
        self
    }
}
