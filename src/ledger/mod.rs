//! Ledger implementations.
//!
//! [`InMemoryLedger`] implements [`AssetLedger`](crate::traits::AssetLedger)
//! for the underlying assets; [`ShareToken`] is the per-pool share book.

mod memory;
mod share;

pub use memory::InMemoryLedger;
pub use share::ShareToken;
