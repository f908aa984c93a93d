//! Unified error types for the exchange engine.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type.  A failed call never leaves partial state behind: every
//! pool-local check runs before the first mutation, so the caller can
//! simply resubmit.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, AmmError>;

/// Every failure the pool, registry, router and ledger can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// The router was called after the caller's deadline.
    #[error("transaction deadline has passed")]
    Expired,

    /// The amount of asset A fell below the caller's minimum.
    #[error("insufficient amount of asset A")]
    InsufficientAAmount,

    /// The amount of asset B fell below the caller's minimum.
    #[error("insufficient amount of asset B")]
    InsufficientBAmount,

    /// A deposit would mint zero shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A withdrawal would pay out zero of either asset.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// The first deposit into a pool is missing one of the two legs.
    #[error("first deposit requires both assets")]
    InsufficientInput,

    /// A pool entry point was re-entered while a call was in progress.
    #[error("pool is locked")]
    Locked,

    /// No pool exists for the requested asset pair.
    #[error("pair not found")]
    PairNotFound,

    /// A pool already exists for the requested asset pair.
    #[error("pair already exists")]
    PairExists,

    /// Both assets of a pair share the same address.
    #[error("identical asset addresses")]
    IdenticalAddresses,

    /// The zero address was used where a real identity is required.
    #[error("zero address")]
    ZeroAddress,

    /// The caller is not allowed to perform this operation.
    #[error("forbidden")]
    Forbidden,

    /// A quote was requested against an empty reserve.
    #[error("insufficient liquidity in reserves")]
    InsufficientLiquidity,

    /// A quote was requested for a zero amount.
    #[error("insufficient amount")]
    InsufficientAmount,

    /// The ledger holder does not own enough units.
    #[error("insufficient balance")]
    InsufficientBalance,

    /// The spender has not been approved for enough units.
    #[error("insufficient allowance")]
    InsufficientAllowance,

    /// An arithmetic result exceeded its representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// A subtraction would have gone below zero.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// A division had a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}
