//! `assemble` / `prove` commands
//!
//! The note comes from a JSON file (as exported by the ledger client) and
//! the tree root from the command line. `FileLedger` serves both through
//! the `LedgerClient` seam so `prove` runs the regular proof flow.

use anyhow::{Context, Result};
use clap::Args;
use shade_account::{PrivateKey, PublicKey, hex0x};
use shade_client::{
    BlockchainStatus, LedgerClient, NoteProofOutcome, NoteProofRequest, RemoteStatus,
    generate_note_proof,
};
use shade_config::ShadeConfig;
use shade_privacy::{Note, NoteProver, ProofInputAssembler, ProofInputVector};
use shade_transaction::AssetId;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct NoteArgs {
    /// Note JSON file
    #[arg(long)]
    pub note: PathBuf,

    /// Account private key (0x-prefixed hex)
    #[arg(long, env = "SHADE_ACCOUNT_KEY")]
    pub account_key: PrivateKey,

    /// Commitment tree root (0x-prefixed hex)
    #[arg(long)]
    pub root: String,

    /// Tree depth (default: [tree].depth from config)
    #[arg(long)]
    pub depth: Option<usize>,
}

impl NoteArgs {
    fn assembler(&self, config: &ShadeConfig) -> ProofInputAssembler {
        ProofInputAssembler::new(self.depth.unwrap_or(config.tree.depth))
    }

    fn root(&self) -> Result<[u8; 32]> {
        hex0x::decode_array(&self.root).with_context(|| format!("Invalid tree root: {}", self.root))
    }
}

pub fn load_note(path: &Path) -> Result<Note> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read note file: {}", path.display()))?;
    parse_note(&contents).with_context(|| format!("Failed to parse note file: {}", path.display()))
}

fn parse_note(contents: &str) -> Result<Note> {
    Ok(serde_json::from_str(contents)?)
}

pub fn assemble(args: &NoteArgs, config: &ShadeConfig) -> Result<ProofInputVector> {
    let note = load_note(&args.note)?;
    let inputs = args
        .assembler(config)
        .assemble_for_note(&note, &args.account_key, &args.root()?)?;
    Ok(inputs)
}

pub async fn prove<P: NoteProver>(
    args: &NoteArgs,
    config: &ShadeConfig,
    prover: &P,
) -> Result<NoteProofOutcome> {
    let ledger = FileLedger {
        note: load_note(&args.note)?,
        root: args.root()?,
    };
    let request = NoteProofRequest {
        user_id: ledger.note.owner,
        asset_id: ledger.note.asset_id,
        account_private_key: args.account_key.clone(),
        circuit_id: config.prover.circuit_id.clone(),
        proving_key_budget: config.prover.proving_key_budget,
    };
    generate_note_proof(&ledger, prover, &args.assembler(config), &request).await
}

/// One note and a fixed root
struct FileLedger {
    note: Note,
    root: [u8; 32],
}

impl LedgerClient for FileLedger {
    async fn get_note_by_asset(&self, user_id: &PublicKey, asset_id: AssetId) -> Result<Note> {
        anyhow::ensure!(
            *user_id == self.note.owner && asset_id == self.note.asset_id,
            "Note file holds asset {} of {}",
            self.note.asset_id,
            self.note.owner
        );
        Ok(self.note.clone())
    }

    async fn get_remote_status(&self) -> Result<RemoteStatus> {
        Ok(RemoteStatus {
            blockchain_status: BlockchainStatus {
                data_root: self.root,
                data_size: 0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shade_privacy::{HashPath, MockProver, PrivacyError, SiblingPair, encode_leaf_index};

    fn note(settled: bool) -> Note {
        let note = Note::pending(AssetId(0), 10, PublicKey([1; 32]), [2; 32], [3; 32]);
        if !settled {
            return note;
        }
        let levels = (0..4u8)
            .map(|l| SiblingPair::new([l; 32], [0x80 | l; 32]))
            .collect();
        note.with_settlement(2, HashPath::new(levels))
    }

    fn args(path: PathBuf) -> NoteArgs {
        NoteArgs {
            note: path,
            account_key: PrivateKey::from_bytes([9; 32]),
            root: hex0x::encode([0x42u8; 32]),
            depth: Some(4),
        }
    }

    fn write_note(dir: &Path, note: &Note) -> PathBuf {
        let path = dir.join("note.json");
        fs::write(&path, serde_json::to_string(note).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_note_json_roundtrip() {
        let json = serde_json::to_string(&note(true)).unwrap();
        assert_eq!(parse_note(&json).unwrap(), note(true));
    }

    #[test]
    fn test_assemble_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(dir.path(), &note(true));

        let inputs = assemble(&args(path), &ShadeConfig::default()).unwrap();
        assert_eq!(inputs.leaf_index, encode_leaf_index(2));
        assert_eq!(inputs.tree_root, hex0x::encode([0x42u8; 32]));
        assert_eq!(inputs.siblings.len(), 4);
    }

    #[test]
    fn test_assemble_pending_note() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(dir.path(), &note(false));

        let err = assemble(&args(path), &ShadeConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PrivacyError>(),
            Some(PrivacyError::NoteNotSettled { .. })
        ));
    }

    #[test]
    fn test_bad_root() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(write_note(dir.path(), &note(true)));
        args.root = "0x1234".into();
        assert!(assemble(&args, &ShadeConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_prove_with_mock() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_note(dir.path(), &note(true));

        let outcome = prove(&args(path), &ShadeConfig::default(), &MockProver::new())
            .await
            .unwrap();
        assert!(outcome.verified);
    }
}
