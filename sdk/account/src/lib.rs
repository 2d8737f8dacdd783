//! Shade account types
//!
//! Keys, public keys and L1 addresses shared by the client and the
//! privacy SDK. Derivation of public keys is done by the rollup SDK; these
//! types only carry the bytes.

pub mod hex0x;

mod address;
mod keys;

pub use address::EthAddress;
pub use hex0x::HexError;
pub use keys::{KeyPair, PrivateKey, PublicKey, SchnorrSigner};
