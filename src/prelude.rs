//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use hydra_exchange::prelude::*;
//! ```

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{ExchangeConfig, ProtocolConfig};
pub use crate::domain::{
    AddedLiquidity, Address, Amount, AssetPair, DepositRequest, Liquidity, RemovedLiquidity,
    WithdrawRequest,
};
pub use crate::error::{AmmError, Result};
pub use crate::ledger::{InMemoryLedger, ShareToken};
pub use crate::math::CheckedArithmetic;
pub use crate::pools::{Exchange, MINIMUM_LIQUIDITY};
pub use crate::registry::PairRegistry;
pub use crate::router::Router;
pub use crate::traits::{AssetLedger, FeeConfig, FromConfig};
