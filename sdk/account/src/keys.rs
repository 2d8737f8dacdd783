use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hex0x::{self, HexError};

/// A 32-byte private scalar (account privacy key or spending key).
///
/// Debug output never shows the key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed hex, for handing the key to the prover.
    pub fn to_hex(&self) -> String {
        hex0x::encode(self.0)
    }
}

impl FromStr for PrivateKey {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex0x::decode_array(s).map(Self)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

/// A rollup account public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "crate::hex0x::array")] pub [u8; 32]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for PublicKey {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex0x::decode_array(s).map(Self)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex0x::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

/// A private key together with its SDK-derived public key.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

/// Handle to a Schnorr signer created by the rollup SDK from a spending key.
#[derive(Debug, Clone)]
pub struct SchnorrSigner {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl SchnorrSigner {
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Self {
        Self {
            private_key,
            public_key,
        }
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }
}
