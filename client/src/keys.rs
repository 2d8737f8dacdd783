//! Deterministic rollup keys from L1 wallet signatures
//!
//! A key is the first 32 bytes of the wallet's signature over a fixed
//! message, so the same wallet always recovers the same keys. The public
//! half is derived by the rollup SDK.

use anyhow::{Context, Result, anyhow, bail};
use rand_core::{OsRng, TryRngCore};
use shade_account::{KeyPair, PrivateKey};

use crate::ledger::RollupSdk;
use crate::wallet::WalletSigner;

pub const PRIVACY_KEY_MESSAGE: &str = "Sign this message to generate your Shade Privacy Key. \
This key lets the application decrypt your balance on Shade.\n\n\
IMPORTANT: Only sign this message if you trust the application.";

pub const SPENDING_KEY_MESSAGE: &str = "Sign this message to generate your Shade Spending Key. \
This key lets the application spend your funds on Shade.\n\n\
IMPORTANT: Only sign this message if you trust the application.";

/// Sign `message` with the wallet's active account and keep 32 bytes.
pub async fn create_signing_key<W: WalletSigner>(wallet: &W, message: &[u8]) -> Result<PrivateKey> {
    let accounts = wallet.request_accounts().await?;
    let account = accounts
        .first()
        .ok_or_else(|| anyhow!("Wallet exposes no accounts"))?;

    let signature = wallet
        .sign_message(message, account)
        .await
        .context("Wallet refused to sign key message")?;
    if signature.len() < 32 {
        bail!("Signature too short for key derivation: {} bytes", signature.len());
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&signature[..32]);
    Ok(PrivateKey::from_bytes(key))
}

async fn key_pair_from_message<W: WalletSigner, S: RollupSdk>(
    wallet: &W,
    sdk: &S,
    message: &[u8],
) -> Result<KeyPair> {
    let private_key = create_signing_key(wallet, message).await?;
    let public_key = sdk.derive_public_key(&private_key).await?;
    Ok(KeyPair {
        private_key,
        public_key,
    })
}

/// Key pair that authorises spending.
pub async fn create_spending_key<W: WalletSigner, S: RollupSdk>(
    wallet: &W,
    sdk: &S,
) -> Result<KeyPair> {
    key_pair_from_message(wallet, sdk, SPENDING_KEY_MESSAGE.as_bytes()).await
}

/// Key pair that decrypts notes (the account key).
pub async fn create_privacy_key<W: WalletSigner, S: RollupSdk>(
    wallet: &W,
    sdk: &S,
) -> Result<KeyPair> {
    key_pair_from_message(wallet, sdk, PRIVACY_KEY_MESSAGE.as_bytes()).await
}

/// Key pair bound to an application-chosen message.
pub async fn create_arbitrary_deterministic_key<W: WalletSigner, S: RollupSdk>(
    wallet: &W,
    sdk: &S,
    message: &str,
) -> Result<KeyPair> {
    key_pair_from_message(wallet, sdk, message.as_bytes()).await
}

/// Fresh random private key (recovery keys).
pub fn random_private_key() -> Result<PrivateKey> {
    let mut key = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|e| anyhow!("OS randomness unavailable: {e}"))?;
    Ok(PrivateKey::from_bytes(key))
}
