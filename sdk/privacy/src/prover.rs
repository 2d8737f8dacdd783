//! Prover seam
//!
//! Proof generation and verification are done by an external proving
//! system. This module fixes the call contract and ships a mock
//! implementation for tests and local runs.

use serde::{Deserialize, Serialize};

use crate::error::{PrivacyError, Result};
use crate::inputs::ProverArg;

/// Opaque verifier key returned alongside a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierKey(#[serde(with = "shade_account::hex0x::bytes")] pub Vec<u8>);

/// Output of a proving run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofArtifact {
    #[serde(with = "shade_account::hex0x::bytes")]
    pub proof: Vec<u8>,
    pub verifier: VerifierKey,
}

/// External proving system for note membership proofs.
#[allow(async_fn_in_trait)]
pub trait NoteProver {
    /// Prove `circuit_id` over positional `inputs`.
    ///
    /// `proving_key_budget` bounds the size of the proving key the backend
    /// may build for the circuit.
    async fn create_proof(
        &self,
        circuit_id: &str,
        inputs: &[ProverArg],
        proving_key_budget: u32,
    ) -> Result<ProofArtifact>;

    /// Check a proof against the verifier key it was produced with.
    async fn verify_proof(&self, verifier: &VerifierKey, proof: &[u8]) -> Result<bool>;
}

// ============================================================================
// Mock Prover
// ============================================================================

const DIGEST_LEN: usize = 32;

/// Mock prover - the "proof" echoes its inputs.
///
/// Layout: `blake3(verifier_key || body) || body`, where `body` is the JSON
/// encoding of the inputs and the verifier key is `blake3(circuit_id)`.
#[derive(Debug, Clone, Default)]
pub struct MockProver;

impl MockProver {
    pub fn new() -> Self {
        Self
    }

    /// Verifier key the mock hands out for a circuit.
    pub fn verifier_for(circuit_id: &str) -> VerifierKey {
        VerifierKey(blake3::hash(circuit_id.as_bytes()).as_bytes().to_vec())
    }

    /// Recover the inputs a mock proof was generated from.
    pub fn echoed_inputs(proof: &[u8]) -> Result<Vec<ProverArg>> {
        let body = proof
            .get(DIGEST_LEN..)
            .ok_or_else(|| PrivacyError::Prover("mock proof too short".into()))?;
        serde_json::from_slice(body)
            .map_err(|e| PrivacyError::Prover(format!("mock proof body: {e}")))
    }

    fn digest(verifier: &VerifierKey, body: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&verifier.0);
        hasher.update(body);
        *hasher.finalize().as_bytes()
    }
}

impl NoteProver for MockProver {
    async fn create_proof(
        &self,
        circuit_id: &str,
        inputs: &[ProverArg],
        proving_key_budget: u32,
    ) -> Result<ProofArtifact> {
        if proving_key_budget == 0 {
            return Err(PrivacyError::Prover("proving key budget is zero".into()));
        }

        let body = serde_json::to_vec(inputs)
            .map_err(|e| PrivacyError::Prover(format!("encode inputs: {e}")))?;
        let verifier = Self::verifier_for(circuit_id);

        let mut proof = Vec::with_capacity(DIGEST_LEN + body.len());
        proof.extend_from_slice(&Self::digest(&verifier, &body));
        proof.extend_from_slice(&body);

        log::debug!(
            "mock proof for {} ({} inputs, {} bytes)",
            circuit_id,
            inputs.len(),
            proof.len()
        );

        Ok(ProofArtifact { proof, verifier })
    }

    async fn verify_proof(&self, verifier: &VerifierKey, proof: &[u8]) -> Result<bool> {
        if proof.len() < DIGEST_LEN {
            return Ok(false);
        }
        let (digest, body) = proof.split_at(DIGEST_LEN);
        Ok(digest == Self::digest(verifier, body).as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Vec<ProverArg> {
        vec![
            ProverArg::Scalar("0x01".into()),
            ProverArg::List(vec!["0x02".into(), "0x03".into()]),
        ]
    }

    #[tokio::test]
    async fn test_mock_proof_verifies() {
        let prover = MockProver::new();
        let artifact = prover.create_proof("membership", &args(), 1 << 19).await.unwrap();

        assert_eq!(artifact.verifier, MockProver::verifier_for("membership"));
        assert!(prover.verify_proof(&artifact.verifier, &artifact.proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_proof_echoes_inputs() {
        let prover = MockProver::new();
        let artifact = prover.create_proof("membership", &args(), 1).await.unwrap();
        assert_eq!(MockProver::echoed_inputs(&artifact.proof).unwrap(), args());
    }

    #[tokio::test]
    async fn test_mock_rejects_tampered_proof() {
        let prover = MockProver::new();
        let mut artifact = prover.create_proof("membership", &args(), 1).await.unwrap();
        let last = artifact.proof.len() - 1;
        artifact.proof[last] ^= 0x01;
        assert!(!prover.verify_proof(&artifact.verifier, &artifact.proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_mock_rejects_other_circuit() {
        let prover = MockProver::new();
        let artifact = prover.create_proof("membership", &args(), 1).await.unwrap();
        let other = MockProver::verifier_for("transfer");
        assert!(!prover.verify_proof(&other, &artifact.proof).await.unwrap());
        assert!(!prover.verify_proof(&other, &[0u8; 4]).await.unwrap());
    }

    #[tokio::test]
    async fn test_zero_budget_fails() {
        let err = MockProver::new()
            .create_proof("membership", &args(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, PrivacyError::Prover(_)));
    }
}
