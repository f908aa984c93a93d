//! Fundamental domain value types used throughout the exchange.
//!
//! Amounts, share units, identities and asset pairs are newtypes with
//! checked arithmetic or validated constructors so that invalid states are
//! rejected at the edge.

mod address;
mod amount;
mod asset_pair;
mod liquidity;
mod liquidity_request;
mod receipt;

pub use address::Address;
pub use amount::Amount;
pub use asset_pair::AssetPair;
pub use liquidity::Liquidity;
pub use liquidity_request::{DepositRequest, WithdrawRequest};
pub use receipt::{AddedLiquidity, RemovedLiquidity};
