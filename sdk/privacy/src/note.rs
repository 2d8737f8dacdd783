//! Notes as reported by the ledger client
//!
//! ```text
//! Note = {
//!     asset_id:   u32,
//!     value:      u128,
//!     owner:      [u8; 32],   // recipient public key
//!     secret:     [u8; 32],   // known only to the owner
//!     commitment: [u8; 32],   // leaf value in the commitment tree
//!     index:      Option<u64>,       // set once settled
//!     hash_path:  Option<HashPath>,  // set once settled
//! }
//! ```

use serde::{Deserialize, Serialize};
use shade_account::{PublicKey, hex0x};
use shade_transaction::AssetId;

use crate::error::{PrivacyError, Result};
use crate::hash_path::HashPath;

/// A note owned by an account, read-only on this side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub asset_id: AssetId,
    pub value: u128,
    pub owner: PublicKey,
    #[serde(with = "shade_account::hex0x::array")]
    pub secret: [u8; 32],
    #[serde(with = "shade_account::hex0x::array")]
    pub commitment: [u8; 32],
    /// Leaf position in the commitment tree (None while pending)
    #[serde(default)]
    pub index: Option<u64>,
    /// Sibling pairs for `index` (None while pending)
    #[serde(default)]
    pub hash_path: Option<HashPath>,
}

/// Borrowed view of a settled note's tree position.
#[derive(Debug, Clone, Copy)]
pub struct SettledLeaf<'a> {
    pub index: u64,
    pub hash_path: &'a HashPath,
}

impl Note {
    /// A note that has not been included in a block yet.
    pub fn pending(
        asset_id: AssetId,
        value: u128,
        owner: PublicKey,
        secret: [u8; 32],
        commitment: [u8; 32],
    ) -> Self {
        Self {
            asset_id,
            value,
            owner,
            secret,
            commitment,
            index: None,
            hash_path: None,
        }
    }

    /// Mark the note as settled at `index` with its hash path.
    pub fn with_settlement(mut self, index: u64, hash_path: HashPath) -> Self {
        self.index = Some(index);
        self.hash_path = Some(hash_path);
        self
    }

    pub fn is_settled(&self) -> bool {
        self.index.is_some() && self.hash_path.is_some()
    }

    /// Tree position of the note, or `NoteNotSettled`.
    pub fn settled_leaf(&self) -> Result<SettledLeaf<'_>> {
        match (self.index, self.hash_path.as_ref()) {
            (Some(index), Some(hash_path)) => Ok(SettledLeaf { index, hash_path }),
            _ => Err(PrivacyError::NoteNotSettled {
                commitment: hex0x::encode(self.commitment),
            }),
        }
    }
}
