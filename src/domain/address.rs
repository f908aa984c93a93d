//! Chain-agnostic 32-byte identity for assets, accounts and pools.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// A generic identity: an asset, an account, a pool or the router.
///
/// Wraps a fixed-size `[u8; 32]` byte array.  All 32-byte sequences are
/// valid; the all-zero address is the unspendable burn address that holds
/// each pool's locked minimum liquidity.
///
/// Renders and parses as `0x`-prefixed lowercase hex.
///
/// # Examples
///
/// ```
/// use hydra_exchange::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// let parsed: Address = addr.to_string().parse().expect("hex round trip");
/// assert_eq!(parsed, addr);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 32]);

impl Address {
    /// The all-zero burn address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the burn address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|_| AmmError::InvalidConfiguration("address must be 32 bytes of hex"))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Address {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}
