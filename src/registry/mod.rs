//! Pair registry.
//!
//! [`PairRegistry`] maps each canonical [`AssetPair`](crate::domain::AssetPair)
//! to its [`Exchange`](crate::pools::Exchange), creates pools on demand and
//! owns the protocol fee recipient.

mod pair_registry;

pub use pair_registry::PairRegistry;
