//! L1 wallet seam
//!
//! The browser wallet (accounts + message signing) is external. `DevWallet`
//! stands in for it in local runs and tests.

use anyhow::{Result, anyhow, bail};
use ed25519_dalek::{Signer, SigningKey};
use rand_core::{OsRng, TryRngCore};
use shade_account::EthAddress;

/// Accounts and message signing exposed by an L1 wallet.
#[allow(async_fn_in_trait)]
pub trait WalletSigner {
    /// Ask the wallet for its accounts (first one is the active account).
    async fn request_accounts(&self) -> Result<Vec<EthAddress>>;

    /// Sign an arbitrary message with `address`.
    async fn sign_message(&self, message: &[u8], address: &EthAddress) -> Result<Vec<u8>>;
}

/// Single-account wallet with deterministic ed25519 signatures.
pub struct DevWallet {
    signing_key: SigningKey,
    address: EthAddress,
}

impl DevWallet {
    /// Reconstructs a wallet from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&seed);
        let digest = blake3::hash(signing_key.verifying_key().as_bytes());
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest.as_bytes()[12..]);

        Self {
            signing_key,
            address: EthAddress(address),
        }
    }

    /// Generates a fresh random wallet.
    pub fn random() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| anyhow!("OS randomness unavailable: {e}"))?;
        Ok(Self::from_seed(seed))
    }

    pub fn address(&self) -> EthAddress {
        self.address
    }
}

impl WalletSigner for DevWallet {
    async fn request_accounts(&self) -> Result<Vec<EthAddress>> {
        Ok(vec![self.address])
    }

    async fn sign_message(&self, message: &[u8], address: &EthAddress) -> Result<Vec<u8>> {
        if address != &self.address {
            bail!("Wallet does not control account {}", address);
        }
        Ok(self.signing_key.sign(message).to_bytes().to_vec())
    }
}
