//! Outcomes returned by the router's liquidity operations.

use super::{Amount, Liquidity};

/// Result of a successful deposit through the router.
///
/// Amounts are oriented to the caller's argument order, not the pool's
/// canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedLiquidity {
    /// Units of the caller's first asset moved into the pool.
    pub amount_a: Amount,
    /// Units of the caller's second asset moved into the pool.
    pub amount_b: Amount,
    /// Shares minted to the recipient.
    pub liquidity: Liquidity,
}

/// Result of a successful withdrawal through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedLiquidity {
    /// Units of the caller's first asset paid to the recipient.
    pub amount_a: Amount,
    /// Units of the caller's second asset paid to the recipient.
    pub amount_b: Amount,
}
