//! Note membership proof
//!
//! ```text
//! get_note_by_asset ──► settled? ──► get_remote_status ──► assemble
//!                          │ no                               │
//!                          ▼                                  ▼
//!                   NoteNotSettled                 create_proof ──► verify_proof
//! ```
//!
//! Ledger calls are single round-trips; retries belong to the ledger client.

use anyhow::{Context, Result};
use shade_account::{PrivateKey, PublicKey};
use shade_privacy::{NoteProver, ProofArtifact, ProofInputAssembler, ProofInputVector};
use shade_transaction::AssetId;
use tracing::{info, warn};

use crate::ledger::LedgerClient;

/// What to prove and with which circuit
#[derive(Debug, Clone)]
pub struct NoteProofRequest {
    pub user_id: PublicKey,
    pub asset_id: AssetId,
    pub account_private_key: PrivateKey,
    pub circuit_id: String,
    pub proving_key_budget: u32,
}

#[derive(Debug, Clone)]
pub struct NoteProofOutcome {
    pub inputs: ProofInputVector,
    pub artifact: ProofArtifact,
    pub verified: bool,
}

/// Look up the user's note, assemble the witness, prove and verify.
///
/// A pending note fails with `PrivacyError::NoteNotSettled` before the tree
/// root is queried.
pub async fn generate_note_proof<L: LedgerClient, P: NoteProver>(
    ledger: &L,
    prover: &P,
    assembler: &ProofInputAssembler,
    request: &NoteProofRequest,
) -> Result<NoteProofOutcome> {
    let note = ledger
        .get_note_by_asset(&request.user_id, request.asset_id)
        .await
        .context("Note lookup failed")?;
    note.settled_leaf()?;

    let status = ledger
        .get_remote_status()
        .await
        .context("Rollup status query failed")?;
    let root = status.blockchain_status.data_root;

    let inputs = assembler.assemble_for_note(&note, &request.account_private_key, &root)?;

    let artifact = prover
        .create_proof(
            &request.circuit_id,
            &inputs.to_prover_args(),
            request.proving_key_budget,
        )
        .await?;
    let verified = prover
        .verify_proof(&artifact.verifier, &artifact.proof)
        .await?;

    if verified {
        info!(
            "note proof verified: circuit={} leaf={} proof={}B",
            request.circuit_id,
            inputs.leaf_index,
            artifact.proof.len()
        );
    } else {
        warn!("note proof rejected by verifier: circuit={}", request.circuit_id);
    }

    Ok(NoteProofOutcome {
        inputs,
        artifact,
        verified,
    })
}
