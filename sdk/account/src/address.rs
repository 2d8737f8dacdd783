use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hex0x::{self, HexError};

/// A 20-byte L1 (Ethereum) address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EthAddress(#[serde(with = "crate::hex0x::array")] pub [u8; 20]);

impl EthAddress {
    /// The zero address; used as the token address of native ETH.
    pub const ZERO: Self = Self([0u8; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for EthAddress {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex0x::decode_array(s).map(Self)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex0x::encode(self.0))
    }
}

impl fmt::Debug for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EthAddress({self})")
    }
}
