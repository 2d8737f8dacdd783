use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use shade_account::hex0x::{self, HexError};

pub mod bridge;
pub mod units;

pub use bridge::BridgeCallData;
pub use units::{ETH_DECIMALS, UnitsError, format_units, parse_ether, parse_units};

/// Identifier of a fungible asset registered on the rollup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// An amount of a given asset, in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetValue {
    pub asset_id: AssetId,
    pub value: u128,
}

impl AssetValue {
    pub fn new(asset_id: AssetId, value: u128) -> Self {
        Self { asset_id, value }
    }
}

/// How quickly a transaction should be settled. Fee quotes are indexed by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxSettlementTime {
    /// Wait for the next regular rollup (cheapest).
    #[default]
    NextRollup,
    /// Publish a rollup immediately (pays for the whole rollup).
    InstantRollup,
}

impl TxSettlementTime {
    /// Position of this speed in a fee quote list.
    pub fn index(self) -> usize {
        match self {
            Self::NextRollup => 0,
            Self::InstantRollup => 1,
        }
    }

    /// Pick the fee for this speed out of a quote list.
    pub fn select<T: Copy>(self, quotes: &[T]) -> Option<T> {
        quotes.get(self.index()).copied()
    }
}

/// Rollup transaction id returned once a transaction is sent.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxId(#[serde(with = "shade_account::hex0x::array")] pub [u8; 32]);

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex0x::encode(self.0))
    }
}

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({self})")
    }
}

impl FromStr for TxId {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex0x::decode_array(s).map(Self)
    }
}
