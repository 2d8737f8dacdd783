//! Prover inputs for a note inclusion proof
//!
//! The membership circuit takes its witness in a fixed order:
//!
//! ```text
//! [ account_private_key, leaf_index, tree_root, [sibling_0 .. sibling_{d-1}], note_secret ]
//! ```
//!
//! Every entry is `0x`-prefixed lowercase hex; the leaf index is padded to
//! 64 hex digits.

use serde::{Deserialize, Serialize};
use shade_account::{PrivateKey, hex0x};
use std::fmt;

use crate::error::{PrivacyError, Result};
use crate::hash_path::HashPath;
use crate::note::Note;

/// Depth of the rollup's note commitment tree.
pub const DEFAULT_TREE_DEPTH: usize = 32;

/// One positional argument handed to the prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProverArg {
    Scalar(String),
    List(Vec<String>),
}

/// Ordered witness for the note membership circuit.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofInputVector {
    pub account_private_key: String,
    pub leaf_index: String,
    pub tree_root: String,
    /// Leaf-to-root
    pub siblings: Vec<String>,
    pub note_secret: String,
}

impl ProofInputVector {
    /// Flatten into the positional argument list the prover consumes.
    pub fn to_prover_args(&self) -> Vec<ProverArg> {
        vec![
            ProverArg::Scalar(self.account_private_key.clone()),
            ProverArg::Scalar(self.leaf_index.clone()),
            ProverArg::Scalar(self.tree_root.clone()),
            ProverArg::List(self.siblings.clone()),
            ProverArg::Scalar(self.note_secret.clone()),
        ]
    }

    /// Rebuild from a positional argument list (inverse of `to_prover_args`).
    pub fn from_prover_args(args: &[ProverArg]) -> Option<Self> {
        match args {
            [
                ProverArg::Scalar(key),
                ProverArg::Scalar(index),
                ProverArg::Scalar(root),
                ProverArg::List(siblings),
                ProverArg::Scalar(secret),
            ] => Some(Self {
                account_private_key: key.clone(),
                leaf_index: index.clone(),
                tree_root: root.clone(),
                siblings: siblings.clone(),
                note_secret: secret.clone(),
            }),
            _ => None,
        }
    }
}

// Key and secret stay out of logs.
impl fmt::Debug for ProofInputVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofInputVector")
            .field("account_private_key", &"..")
            .field("leaf_index", &self.leaf_index)
            .field("tree_root", &self.tree_root)
            .field("siblings", &self.siblings.len())
            .field("note_secret", &"..")
            .finish()
    }
}

/// Fixed-width encoding of a leaf index.
pub fn encode_leaf_index(index: u64) -> String {
    format!("0x{:064x}", index)
}

/// Builds prover inputs for notes in a tree of a fixed depth.
#[derive(Debug, Clone, Copy)]
pub struct ProofInputAssembler {
    depth: usize,
}

impl Default for ProofInputAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_DEPTH)
    }
}

impl ProofInputAssembler {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Assemble inputs from an explicit index and hash path.
    ///
    /// Both must be present; a pending note has neither.
    pub fn assemble(
        &self,
        index: Option<u64>,
        hash_path: Option<&HashPath>,
        account_private_key: &PrivateKey,
        tree_root: &[u8; 32],
        note_secret: &[u8; 32],
        commitment: &[u8; 32],
    ) -> Result<ProofInputVector> {
        let (index, hash_path) = match (index, hash_path) {
            (Some(index), Some(path)) => (index, path),
            _ => {
                return Err(PrivacyError::NoteNotSettled {
                    commitment: hex0x::encode(commitment),
                });
            }
        };

        self.check_shape(index, hash_path)?;

        let siblings = hash_path
            .siblings_for(index)
            .iter()
            .map(hex0x::encode)
            .collect::<Vec<_>>();

        log::debug!(
            "assembled inclusion inputs: leaf={} levels={} root={}",
            index,
            siblings.len(),
            hex0x::encode(tree_root)
        );

        Ok(ProofInputVector {
            account_private_key: account_private_key.to_hex(),
            leaf_index: encode_leaf_index(index),
            tree_root: hex0x::encode(tree_root),
            siblings,
            note_secret: hex0x::encode(note_secret),
        })
    }

    /// Assemble inputs for a note looked up from the ledger.
    pub fn assemble_for_note(
        &self,
        note: &Note,
        account_private_key: &PrivateKey,
        tree_root: &[u8; 32],
    ) -> Result<ProofInputVector> {
        self.assemble(
            note.index,
            note.hash_path.as_ref(),
            account_private_key,
            tree_root,
            &note.secret,
            &note.commitment,
        )
    }

    fn check_shape(&self, index: u64, hash_path: &HashPath) -> Result<()> {
        if hash_path.depth() != self.depth {
            return Err(PrivacyError::MalformedHashPath {
                levels: hash_path.depth(),
                depth: self.depth,
            });
        }
        // checked_shr is None for depth >= 64, where every u64 fits
        let overflow = u32::try_from(self.depth)
            .ok()
            .and_then(|d| index.checked_shr(d))
            .unwrap_or(0);
        if overflow != 0 {
            return Err(PrivacyError::LeafIndexOutOfRange {
                index,
                depth: self.depth,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_path::SiblingPair;
    use shade_account::PublicKey;
    use shade_transaction::AssetId;

    fn h(tag: u8) -> [u8; 32] {
        [tag; 32]
    }

    fn hash_pair(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(left);
        hasher.update(right);
        *hasher.finalize().as_bytes()
    }

    /// Full binary tree over `leaves`; returns (root, hash path for `index`).
    fn reference_tree(leaves: &[[u8; 32]], index: usize) -> ([u8; 32], HashPath) {
        let mut level: Vec<[u8; 32]> = leaves.to_vec();
        let mut position = index;
        let mut pairs = Vec::new();
        while level.len() > 1 {
            let base = position & !1;
            pairs.push(SiblingPair::new(level[base], level[base + 1]));
            level = level
                .chunks_exact(2)
                .map(|c| hash_pair(&c[0], &c[1]))
                .collect();
            position >>= 1;
        }
        (level[0], HashPath::new(pairs))
    }

    fn root_from_siblings(leaf: [u8; 32], index: u64, siblings: &[String]) -> [u8; 32] {
        let mut current = leaf;
        let mut position = index;
        for sibling in siblings {
            let sibling: [u8; 32] = hex0x::decode_array(sibling).unwrap();
            current = if position & 1 == 1 {
                hash_pair(&sibling, &current)
            } else {
                hash_pair(&current, &sibling)
            };
            position >>= 1;
        }
        current
    }

    fn key() -> PrivateKey {
        PrivateKey::from_bytes(h(0xAA))
    }

    #[test]
    fn test_index_five_three_levels() {
        let path = HashPath::new(vec![
            SiblingPair::new(h(0x10), h(0x11)),
            SiblingPair::new(h(0x20), h(0x21)),
            SiblingPair::new(h(0x30), h(0x31)),
        ]);
        let assembler = ProofInputAssembler::new(3);
        let inputs = assembler
            .assemble(Some(5), Some(&path), &key(), &h(0xEE), &h(0xBB), &h(0xCC))
            .unwrap();

        assert_eq!(
            inputs.siblings,
            vec![hex0x::encode(h(0x10)), hex0x::encode(h(0x21)), hex0x::encode(h(0x30))]
        );
        assert_eq!(inputs.leaf_index, format!("0x{}5", "0".repeat(63)));
        assert_eq!(inputs.tree_root, hex0x::encode(h(0xEE)));
        assert_eq!(inputs.note_secret, hex0x::encode(h(0xBB)));
        assert_eq!(inputs.account_private_key, hex0x::encode(h(0xAA)));
    }

    #[test]
    fn test_siblings_rebuild_reference_root() {
        let leaves: Vec<[u8; 32]> = (0u8..16).map(|i| h(i + 1)).collect();
        let assembler = ProofInputAssembler::new(4);

        for index in 0..leaves.len() {
            let (root, path) = reference_tree(&leaves, index);
            let inputs = assembler
                .assemble(Some(index as u64), Some(&path), &key(), &root, &h(0), &leaves[index])
                .unwrap();

            assert_eq!(inputs.siblings.len(), 4);
            assert_eq!(
                root_from_siblings(leaves[index], index as u64, &inputs.siblings),
                root,
                "leaf {index} does not hash back to the root"
            );
        }
    }

    #[test]
    fn test_index_zero_uses_right_at_every_level() {
        let leaves: Vec<[u8; 32]> = (0u8..8).map(|i| h(i + 1)).collect();
        let (root, path) = reference_tree(&leaves, 0);
        let inputs = ProofInputAssembler::new(3)
            .assemble(Some(0), Some(&path), &key(), &root, &h(0), &leaves[0])
            .unwrap();

        let rights: Vec<String> = path.levels().iter().map(|p| hex0x::encode(p.right)).collect();
        assert_eq!(inputs.siblings, rights);
        assert_eq!(inputs.leaf_index, encode_leaf_index(0));
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let leaves: Vec<[u8; 32]> = (0u8..8).map(|i| h(i + 1)).collect();
        let (root, path) = reference_tree(&leaves, 6);
        let assembler = ProofInputAssembler::new(3);

        let a = assembler
            .assemble(Some(6), Some(&path), &key(), &root, &h(9), &leaves[6])
            .unwrap();
        let b = assembler
            .assemble(Some(6), Some(&path), &key(), &root, &h(9), &leaves[6])
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_vec(&a.to_prover_args()).unwrap(),
            serde_json::to_vec(&b.to_prover_args()).unwrap()
        );
    }

    #[test]
    fn test_missing_index_is_not_settled() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2))]);
        let err = ProofInputAssembler::new(1)
            .assemble(None, Some(&path), &key(), &h(0), &h(0), &h(7))
            .unwrap_err();
        assert_eq!(
            err,
            PrivacyError::NoteNotSettled {
                commitment: hex0x::encode(h(7))
            }
        );
    }

    #[test]
    fn test_missing_path_is_not_settled() {
        let err = ProofInputAssembler::new(1)
            .assemble(Some(0), None, &key(), &h(0), &h(0), &h(7))
            .unwrap_err();
        assert!(matches!(err, PrivacyError::NoteNotSettled { .. }));
    }

    #[test]
    fn test_not_settled_wins_over_bad_depth() {
        // Settlement is checked before the path shape
        let note = Note::pending(AssetId(0), 1, PublicKey(h(1)), h(2), h(3));
        let err = ProofInputAssembler::new(32)
            .assemble_for_note(&note, &key(), &h(0))
            .unwrap_err();
        assert!(matches!(err, PrivacyError::NoteNotSettled { .. }));
    }

    #[test]
    fn test_depth_mismatch_is_malformed() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2)); 3]);
        let err = ProofInputAssembler::new(4)
            .assemble(Some(1), Some(&path), &key(), &h(0), &h(0), &h(0))
            .unwrap_err();
        assert_eq!(err, PrivacyError::MalformedHashPath { levels: 3, depth: 4 });

        let err = ProofInputAssembler::new(2)
            .assemble(Some(1), Some(&path), &key(), &h(0), &h(0), &h(0))
            .unwrap_err();
        assert_eq!(err, PrivacyError::MalformedHashPath { levels: 3, depth: 2 });
    }

    #[test]
    fn test_index_beyond_tree_is_rejected() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2)); 3]);
        let assembler = ProofInputAssembler::new(3);

        assert!(assembler.assemble(Some(7), Some(&path), &key(), &h(0), &h(0), &h(0)).is_ok());
        assert_eq!(
            assembler
                .assemble(Some(8), Some(&path), &key(), &h(0), &h(0), &h(0))
                .unwrap_err(),
            PrivacyError::LeafIndexOutOfRange { index: 8, depth: 3 }
        );
    }

    #[test]
    fn test_full_depth_accepts_any_index() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2)); 64]);
        let inputs = ProofInputAssembler::new(64)
            .assemble(Some(u64::MAX), Some(&path), &key(), &h(0), &h(0), &h(0))
            .unwrap();
        assert_eq!(inputs.siblings.len(), 64);
        assert!(inputs.siblings.iter().all(|s| s == &hex0x::encode(h(1))));
        assert_eq!(inputs.leaf_index, format!("0x{}{}", "0".repeat(48), "f".repeat(16)));
    }

    #[test]
    fn test_default_tree_depth() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2)); DEFAULT_TREE_DEPTH]);
        let note = Note::pending(AssetId(0), 1, PublicKey(h(1)), h(2), h(3))
            .with_settlement(3, path);
        let inputs = ProofInputAssembler::default()
            .assemble_for_note(&note, &key(), &h(4))
            .unwrap();
        assert_eq!(inputs.siblings.len(), 32);
        assert_eq!(inputs.note_secret, hex0x::encode(h(2)));
    }

    #[test]
    fn test_prover_args_order_and_shape() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2)); 2]);
        let inputs = ProofInputAssembler::new(2)
            .assemble(Some(2), Some(&path), &key(), &h(4), &h(5), &h(0))
            .unwrap();

        let args = inputs.to_prover_args();
        let json = serde_json::to_value(&args).unwrap();
        let array = json.as_array().unwrap();
        assert_eq!(array.len(), 5);
        assert_eq!(array[0], hex0x::encode(h(0xAA)));
        assert_eq!(array[2], hex0x::encode(h(4)));
        assert_eq!(array[3].as_array().unwrap().len(), 2);
        assert_eq!(array[4], hex0x::encode(h(5)));

        assert_eq!(ProofInputVector::from_prover_args(&args), Some(inputs));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let path = HashPath::new(vec![SiblingPair::new(h(1), h(2))]);
        let inputs = ProofInputAssembler::new(1)
            .assemble(Some(0), Some(&path), &key(), &h(4), &h(0xBB), &h(0))
            .unwrap();
        let shown = format!("{:?}", inputs);
        assert!(!shown.contains("aaaa"));
        assert!(!shown.contains("bbbb"));
    }
}
