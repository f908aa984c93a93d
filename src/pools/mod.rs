//! The constant-product pool engine.
//!
//! One [`Exchange`] exists per asset pair.  It holds the reserves, the
//! share book and the protocol-fee checkpoint, and exposes the low-level
//! entry points (`mint`, `burn`, `sync`, `skim`) that the
//! [`Router`](crate::router::Router) drives.
//!
//! Entry points are guarded by a per-pool re-entry flag: a call that
//! arrives while another entry point of the same pool is still running
//! (for example from inside a ledger transfer) fails with
//! [`AmmError::Locked`](crate::error::AmmError::Locked).

mod exchange;

#[cfg(test)]
mod proptest_properties;

pub use exchange::{BurnPreview, Exchange, MintPreview, MINIMUM_LIQUIDITY};
