//! Shade Privacy SDK
//!
//! Turns a settled note into the witness of a note membership proof.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  Ledger client                                                  │
//! │    note lookup ──► Note { index, hash_path, secret, .. }        │
//! │    status      ──► data_root                                    │
//! └─────────────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ProofInputAssembler                                            │
//! │    index bits select one sibling per level (leaf → root)        │
//! │    [ key, index, root, [siblings], secret ]                     │
//! └─────────────────────────────────────────────────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  NoteProver (external)  create_proof ─► verify_proof            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod hash_path;
pub mod inputs;
pub mod note;
pub mod prover;

pub use error::{PrivacyError, Result};
pub use hash_path::{HashPath, SiblingPair};
pub use inputs::{
    DEFAULT_TREE_DEPTH, ProofInputAssembler, ProofInputVector, ProverArg, encode_leaf_index,
};
pub use note::{Note, SettledLeaf};
pub use prover::{MockProver, NoteProver, ProofArtifact, VerifierKey};
