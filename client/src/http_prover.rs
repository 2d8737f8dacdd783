//! Prover Coordinator Client
//!
//! HTTP client for an external prover coordinator. Implements `NoteProver`.
//!
//! ```text
//! POST {url}/v1/prove   {circuit_id, inputs, proving_key_budget} → {proof, verifier}
//! POST {url}/v1/verify  {verifier, proof}                         → {valid}
//! GET  {url}/v1/health
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use shade_account::hex0x;
use shade_config::ProverConfig;
use shade_privacy::{NoteProver, PrivacyError, ProofArtifact, ProverArg, VerifierKey};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpProverConfig {
    /// Base URL of the coordinator (e.g. "http://localhost:8090")
    pub coordinator_url: String,
    /// Timeout for a single proving request
    pub proof_timeout: Duration,
}

impl Default for HttpProverConfig {
    fn default() -> Self {
        Self {
            coordinator_url: "http://127.0.0.1:8090".to_string(),
            proof_timeout: Duration::from_secs(300),
        }
    }
}

impl From<&ProverConfig> for HttpProverConfig {
    fn from(cfg: &ProverConfig) -> Self {
        Self {
            coordinator_url: cfg.coordinator_url.clone(),
            proof_timeout: Duration::from_secs(cfg.proof_timeout_secs),
        }
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProveRequest<'a> {
    pub circuit_id: &'a str,
    pub inputs: &'a [ProverArg],
    pub proving_key_budget: u32,
}

#[derive(Debug, Serialize)]
pub struct VerifyRequest<'a> {
    pub verifier: &'a VerifierKey,
    pub proof: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ApiResponse<T> {
    Success {
        data: T,
    },
    Error {
        message: String,
        code: Option<String>,
    },
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> std::result::Result<T, PrivacyError> {
        match self {
            ApiResponse::Success { data } => Ok(data),
            ApiResponse::Error { message, code } => Err(PrivacyError::Prover(format!(
                "coordinator error ({}): {}",
                code.unwrap_or_else(|| "unknown".to_string()),
                message
            ))),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// `NoteProver` backed by a remote coordinator
pub struct HttpProver {
    config: HttpProverConfig,
    client: reqwest::Client,
}

impl HttpProver {
    pub fn new(config: HttpProverConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.proof_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { config, client })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.coordinator_url.trim_end_matches('/'), path)
    }

    /// Check if the coordinator is reachable
    pub async fn health_check(&self) -> bool {
        match self.client.get(self.url("/v1/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Prover coordinator health check failed: {}", e);
                false
            }
        }
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, PrivacyError> {
        let url = self.url(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PrivacyError::Prover(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PrivacyError::Prover(format!(
                "coordinator returned {status}: {body}"
            )));
        }

        let api_response: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| PrivacyError::Prover(format!("invalid coordinator response: {e}")))?;
        api_response.into_result()
    }
}

impl NoteProver for HttpProver {
    async fn create_proof(
        &self,
        circuit_id: &str,
        inputs: &[ProverArg],
        proving_key_budget: u32,
    ) -> shade_privacy::Result<ProofArtifact> {
        let start = Instant::now();
        debug!("submitting {} inputs for circuit {}", inputs.len(), circuit_id);

        let artifact: ProofArtifact = self
            .post(
                "/v1/prove",
                &ProveRequest {
                    circuit_id,
                    inputs,
                    proving_key_budget,
                },
            )
            .await?;

        info!(
            "proof for {} received in {:?} ({} bytes)",
            circuit_id,
            start.elapsed(),
            artifact.proof.len()
        );
        Ok(artifact)
    }

    async fn verify_proof(
        &self,
        verifier: &VerifierKey,
        proof: &[u8],
    ) -> shade_privacy::Result<bool> {
        let response: VerifyResponse = self
            .post(
                "/v1/verify",
                &VerifyRequest {
                    verifier,
                    proof: hex0x::encode(proof),
                },
            )
            .await?;
        Ok(response.valid)
    }
}
