//! Canonical pair → pool table and the protocol fee switch.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::info;

use crate::config::{ExchangeConfig, ProtocolConfig};
use crate::domain::{Address, AssetPair, Liquidity};
use crate::error::AmmError;
use crate::pools::Exchange;
use crate::traits::{FeeConfig, FromConfig};

/// Creates and indexes one [`Exchange`] per asset pair.
///
/// The registry is also the [`FeeConfig`] every pool consults: while
/// `fee_to` is set, pools mint the protocol's share of invariant growth
/// to it.  Only `fee_to_setter` may change either field.
///
/// # Thread Safety
///
/// Pools live in a [`DashMap`] keyed by canonical pair; creation goes
/// through the map's entry API so two concurrent `create_pair` calls for
/// the same pair cannot both succeed.
///
/// # Example
///
/// ```rust
/// use hydra_exchange::config::ProtocolConfig;
/// use hydra_exchange::domain::Address;
/// use hydra_exchange::registry::PairRegistry;
/// use hydra_exchange::traits::FromConfig;
///
/// let admin = Address::from_bytes([0xAAu8; 32]);
/// let aave = Address::from_bytes([1u8; 32]);
/// let dai = Address::from_bytes([2u8; 32]);
///
/// let cfg = ProtocolConfig::new(admin).expect("valid");
/// let registry = PairRegistry::from_config(&cfg).expect("registry");
///
/// let pool = registry.create_pair(dai, aave).expect("created");
/// assert_eq!(pool.pair().first(), aave);
/// assert!(registry.get_pair(aave, dai).is_some());
/// assert_eq!(registry.all_pairs_len(), 1);
/// ```
#[derive(Debug)]
pub struct PairRegistry {
    pools: DashMap<AssetPair, Arc<Exchange>>,
    all_pairs: RwLock<Vec<AssetPair>>,
    fee_to: RwLock<Option<Address>>,
    fee_to_setter: RwLock<Address>,
    minimum_liquidity: Liquidity,
}

impl FromConfig<ProtocolConfig> for PairRegistry {
    /// Creates an empty registry.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`ProtocolConfig::validate`].
    fn from_config(config: &ProtocolConfig) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            pools: DashMap::new(),
            all_pairs: RwLock::new(Vec::new()),
            fee_to: RwLock::new(config.fee_to),
            fee_to_setter: RwLock::new(config.fee_to_setter),
            minimum_liquidity: config.minimum_liquidity,
        })
    }
}

impl PairRegistry {
    /// Pool for the pair, in either argument order.
    ///
    /// Returns `None` if no pool exists or the addresses do not form a
    /// valid pair.
    #[must_use]
    pub fn get_pair(&self, asset_a: Address, asset_b: Address) -> Option<Arc<Exchange>> {
        let pair = AssetPair::new(asset_a, asset_b).ok()?;
        self.pools.get(&pair).map(|entry| Arc::clone(entry.value()))
    }

    /// Creates the pool for a new pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if the assets are equal.
    /// - [`AmmError::ZeroAddress`] if either asset is the zero address.
    /// - [`AmmError::PairExists`] if the pair already has a pool.
    pub fn create_pair(&self, asset_a: Address, asset_b: Address) -> Result<Arc<Exchange>, AmmError> {
        let pair = AssetPair::new(asset_a, asset_b)?;
        let config = ExchangeConfig::new(pair).with_minimum_liquidity(self.minimum_liquidity)?;

        match self.pools.entry(pair) {
            Entry::Occupied(_) => Err(AmmError::PairExists),
            Entry::Vacant(slot) => {
                let pool = Arc::new(Exchange::from_config(&config)?);
                slot.insert(Arc::clone(&pool));
                let mut all_pairs = self.all_pairs.write();
                all_pairs.push(pair);
                info!(
                    asset_a = %pair.first(),
                    asset_b = %pair.second(),
                    pool = %pool.address(),
                    index = all_pairs.len(),
                    "pair created"
                );
                Ok(pool)
            }
        }
    }

    /// Every pair in creation order.
    #[must_use]
    pub fn all_pairs(&self) -> Vec<AssetPair> {
        self.all_pairs.read().clone()
    }

    /// Number of pairs created.
    #[must_use]
    pub fn all_pairs_len(&self) -> usize {
        self.all_pairs.read().len()
    }

    /// Current account allowed to change the fee settings.
    #[must_use]
    pub fn fee_to_setter(&self) -> Address {
        *self.fee_to_setter.read()
    }

    /// Shares locked on each new pool's first deposit.
    #[must_use]
    pub const fn minimum_liquidity(&self) -> Liquidity {
        self.minimum_liquidity
    }

    /// Turns the protocol fee on (`Some`) or off (`None`).
    ///
    /// A zero address is treated as off.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee setter.
    pub fn set_fee_to(&self, caller: Address, fee_to: Option<Address>) -> Result<(), AmmError> {
        self.authorize(caller)?;
        let fee_to = fee_to.filter(|addr| !addr.is_zero());
        *self.fee_to.write() = fee_to;
        match fee_to {
            Some(recipient) => info!(%recipient, "protocol fee on"),
            None => info!("protocol fee off"),
        }
        Ok(())
    }

    /// Hands the setter role to another account.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Forbidden`] unless `caller` is the fee setter.
    /// - [`AmmError::ZeroAddress`] if `setter` is the zero address.
    pub fn set_fee_to_setter(&self, caller: Address, setter: Address) -> Result<(), AmmError> {
        self.authorize(caller)?;
        if setter.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        *self.fee_to_setter.write() = setter;
        info!(%setter, "fee setter changed");
        Ok(())
    }

    fn authorize(&self, caller: Address) -> Result<(), AmmError> {
        if caller == *self.fee_to_setter.read() {
            Ok(())
        } else {
            Err(AmmError::Forbidden)
        }
    }
}

impl FeeConfig for PairRegistry {
    fn fee_to(&self) -> Option<Address> {
        *self.fee_to.read()
    }
}
