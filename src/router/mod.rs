//! Liquidity routing.
//!
//! [`Router`] is the caller-facing entry point for adding and removing
//! liquidity.  It sizes deposits against the pool ratio with the pure
//! helpers in this module ([`quote`], [`optimal_deposit`]), checks the
//! caller's slippage floors and deadline, and only then moves assets and
//! calls into the pool.
//!
//! # Sizing Rule
//!
//! ```text
//! empty pool:  (a_desired, b_desired)
//! b_opt = a_desired · reserve_b / reserve_a
//! b_opt ≤ b_desired  →  (a_desired, b_opt)      requires b_opt ≥ b_min
//! otherwise          →  (a_opt, b_desired)      a_opt = b_desired · reserve_a / reserve_b,
//!                                               requires a_opt ≥ a_min
//! ```

mod library;
mod liquidity_router;

pub use library::{optimal_deposit, oriented_reserves, quote, sort_assets};
pub use liquidity_router::Router;
