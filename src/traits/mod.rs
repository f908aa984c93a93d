//! Seams between the exchange and its collaborators.
//!
//! - [`AssetLedger`]: the fungible ledger holding both underlying assets.
//! - [`FeeConfig`]: the protocol fee switch, read on every mint and burn.
//! - [`FromConfig`]: validated construction from configuration structs.

mod asset_ledger;
mod fee_config;
mod from_config;

pub use asset_ledger::AssetLedger;
pub use fee_config::FeeConfig;
pub use from_config::FromConfig;
