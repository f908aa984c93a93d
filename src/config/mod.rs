//! Declarative, validated configuration.
//!
//! [`ProtocolConfig`] describes a registry (fee setter, initial fee
//! recipient, minimum liquidity) and can be loaded from TOML with the
//! `toml-config` feature.  [`ExchangeConfig`] describes one pool and is
//! produced by the registry when a pair is created.

mod exchange;
mod protocol;

pub use exchange::ExchangeConfig;
pub use protocol::ProtocolConfig;
