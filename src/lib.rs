//! # Hydra Exchange
//!
//! Constant-product exchange engine: pooled reserves of two assets, share
//! accounting, a protocol fee tied to invariant growth, and a router that
//! sizes deposits and enforces slippage floors and deadlines.
//!
//! All accounting is exact integer math.  Products of two amounts are
//! carried in 256 bits and every division floors, so results are
//! reproducible to the last unit.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `toml-config` | yes | [`ProtocolConfig::from_toml_str`](config::ProtocolConfig::from_toml_str) |
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use hydra_exchange::clock::ManualClock;
//! use hydra_exchange::config::ProtocolConfig;
//! use hydra_exchange::domain::{Address, Amount, DepositRequest, WithdrawRequest};
//! use hydra_exchange::ledger::InMemoryLedger;
//! use hydra_exchange::registry::PairRegistry;
//! use hydra_exchange::router::Router;
//! use hydra_exchange::traits::{AssetLedger, FromConfig};
//!
//! let admin = Address::from_bytes([0xAAu8; 32]);
//! let usdc = Address::from_bytes([1u8; 32]);
//! let weth = Address::from_bytes([2u8; 32]);
//! let alice = Address::from_bytes([9u8; 32]);
//! let router_addr = Address::from_bytes([0xEEu8; 32]);
//!
//! // 1. Registry and ledger
//! let config = ProtocolConfig::new(admin).expect("valid config");
//! let registry = Arc::new(PairRegistry::from_config(&config).expect("registry"));
//! let ledger = Arc::new(InMemoryLedger::new());
//! let router = Router::new(router_addr, Arc::clone(&registry), Arc::clone(&ledger), ManualClock::new(0));
//!
//! // 2. Fund Alice and approve the router
//! for asset in [usdc, weth] {
//!     ledger.mint(asset, alice, Amount::new(10_000_000)).expect("fund");
//!     ledger.approve(asset, alice, router_addr, Amount::MAX).expect("approve");
//! }
//!
//! // 3. Seed the pool (created on first deposit)
//! let deposit = DepositRequest::new(usdc, weth, alice, 100)
//!     .desired(Amount::new(1_000_000), Amount::new(4_000_000));
//! let added = router.deposit_liquidity(alice, &deposit).expect("deposit");
//! assert_eq!(added.liquidity.get(), 2_000_000 - 1_000);
//!
//! // 4. Redeem half of the shares
//! let pool = registry.get_pair(usdc, weth).expect("pool exists");
//! pool.approve_shares(alice, router_addr, added.liquidity);
//! let half = hydra_exchange::domain::Liquidity::new(added.liquidity.get() / 2);
//! let removed = router
//!     .withdraw_liquidity(alice, &WithdrawRequest::new(usdc, weth, half, alice, 100))
//!     .expect("withdraw");
//! assert!(removed.amount_a.get() > 0 && removed.amount_b.get() > 0);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Caller    │  DepositRequest / WithdrawRequest
//! └──────┬──────┘
//!        │ deposit_liquidity / withdraw_liquidity
//!        ▼
//! ┌─────────────┐
//! │   Router    │  sizing, slippage floors, deadlines (Clock)
//! └──────┬──────┘
//!        │ get_pair / create_pair        transfer_from
//!        ▼                                     ▼
//! ┌─────────────┐                       ┌─────────────┐
//! │  Registry   │  pair → pool, fee_to  │ AssetLedger │
//! └──────┬──────┘                       └──────▲──────┘
//!        │ Arc<Exchange>                       │ balance_of / transfer
//!        ▼                                     │
//! ┌─────────────┐                              │
//! │  Exchange   │  reserves, shares, k_last ───┘
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Amount`](domain::Amount), [`Liquidity`](domain::Liquidity), [`Address`](domain::Address), [`AssetPair`](domain::AssetPair), requests and receipts |
//! | [`math`]   | `mul_div`, integer square root, protocol fee formula |
//! | [`traits`] | Seams: [`AssetLedger`](traits::AssetLedger), [`FeeConfig`](traits::FeeConfig), [`FromConfig`](traits::FromConfig) |
//! | [`ledger`] | [`InMemoryLedger`](ledger::InMemoryLedger) and the per-pool [`ShareToken`](ledger::ShareToken) |
//! | [`config`] | Validated [`ProtocolConfig`](config::ProtocolConfig) and [`ExchangeConfig`](config::ExchangeConfig) |
//! | [`pools`]  | The [`Exchange`](pools::Exchange) pool engine |
//! | [`registry`] | [`PairRegistry`](registry::PairRegistry) |
//! | [`router`] | [`Router`](router::Router) and sizing helpers |
//! | [`clock`]  | Deadline time source |
//! | [`error`]  | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod registry;
pub mod router;
pub mod traits;
