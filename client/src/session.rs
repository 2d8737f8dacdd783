//! Wallet session
//!
//! One `Session` per connected wallet. Each handler checks the state it
//! needs and fails with `SessionError` when a previous step is missing:
//!
//! ```text
//! connect → login → init_user ─┬─► generate_spending_key ─► register
//!                              ├─► deposit
//!                              ├─► swap_eth_to_wsteth (needs spending key)
//!                              └─► prove_note
//! ```

use anyhow::{Context, Result};
use shade_account::{EthAddress, KeyPair, PublicKey, SchnorrSigner};
use shade_config::{SettlementToml, ShadeConfig};
use shade_privacy::{NoteProver, ProofInputAssembler};
use shade_transaction::{ETH_DECIMALS, TxId, TxSettlementTime, format_units, parse_ether};
use tracing::{info, warn};

use crate::bridges::{BridgeDataProvider, BridgeRegistry};
use crate::error::{FlowError, SessionError};
use crate::flows::{
    DefiSwapRequest, ETH_SYMBOL, RegisterRequest, defi_swap, deposit_eth, register_account,
};
use crate::keys::{create_privacy_key, create_spending_key, random_private_key};
use crate::ledger::{RollupSdk, SdkUser};
use crate::note_proof::{NoteProofOutcome, NoteProofRequest, generate_note_proof};
use crate::wallet::WalletSigner;

/// Symbol of the swap output asset
pub const WSTETH_SYMBOL: &str = "WSTETH";

/// Session parameters taken from `ShadeConfig`
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub settlement_time: TxSettlementTime,
    pub swap_bridge: String,
    /// Used when the registry has no entry for `swap_bridge`
    pub swap_bridge_address_id: Option<u32>,
    pub swap_min_output: u64,
    pub circuit_id: String,
    pub proving_key_budget: u32,
    pub tree_depth: usize,
    pub explorer_url: String,
}

impl SessionSettings {
    pub fn from_config(config: &ShadeConfig) -> Self {
        let settlement_time = match config.rollup.settlement_time {
            SettlementToml::NextRollup => TxSettlementTime::NextRollup,
            SettlementToml::InstantRollup => TxSettlementTime::InstantRollup,
        };
        Self {
            settlement_time,
            swap_bridge: config.bridges.swap_bridge.clone(),
            swap_bridge_address_id: config.bridges.swap_bridge_address_id,
            swap_min_output: config.bridges.swap_min_output,
            circuit_id: config.prover.circuit_id.clone(),
            proving_key_budget: config.prover.proving_key_budget,
            tree_depth: config.tree.depth,
            explorer_url: config.explorer.url.clone(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&ShadeConfig::default())
    }
}

/// State of one connected wallet
pub struct Session<S: RollupSdk, W: WalletSigner> {
    wallet: W,
    sdk: S,
    settings: SessionSettings,
    bridges: BridgeRegistry,
    address: EthAddress,
    account_keys: Option<KeyPair>,
    user: Option<SdkUser>,
    registered: bool,
    eth_balance: u128,
    spending_keys: Option<KeyPair>,
    signer: Option<SchnorrSigner>,
}

impl<S: RollupSdk, W: WalletSigner> Session<S, W> {
    /// Ask the wallet for its accounts and start the SDK.
    pub async fn connect(wallet: W, sdk: S, settings: SessionSettings) -> Result<Self> {
        let accounts = wallet.request_accounts().await?;
        let address = *accounts.first().ok_or(SessionError::NoWalletAccount)?;
        sdk.run().await.context("Failed to start rollup SDK")?;
        info!("wallet connected: {}", address);

        Ok(Self {
            wallet,
            sdk,
            settings,
            bridges: BridgeRegistry::default(),
            address,
            account_keys: None,
            user: None,
            registered: false,
            eth_balance: 0,
            spending_keys: None,
            signer: None,
        })
    }

    pub fn with_bridges(mut self, bridges: BridgeRegistry) -> Self {
        self.bridges = bridges;
        self
    }

    pub async fn load_bridges<P: BridgeDataProvider>(&mut self, provider: &P) -> Result<()> {
        self.bridges = BridgeRegistry::fetch(provider).await?;
        Ok(())
    }

    pub fn address(&self) -> EthAddress {
        self.address
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn account_public_key(&self) -> Option<PublicKey> {
        self.account_keys.as_ref().map(|k| k.public_key)
    }

    pub fn user(&self) -> Option<SdkUser> {
        self.user
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn eth_balance(&self) -> u128 {
        self.eth_balance
    }

    pub fn spending_public_key(&self) -> Option<PublicKey> {
        self.spending_keys.as_ref().map(|k| k.public_key)
    }

    /// Derive the account (privacy) keys from a wallet signature.
    pub async fn login(&mut self) -> Result<PublicKey> {
        let keys = create_privacy_key(&self.wallet, &self.sdk).await?;
        let public_key = keys.public_key;
        self.account_keys = Some(keys);
        info!("logged in as {}", public_key);
        Ok(public_key)
    }

    /// Load (or add) the rollup user and wait for its notes to sync.
    pub async fn init_user(&mut self) -> Result<SdkUser> {
        let keys = self.account_keys.as_ref().ok_or(SessionError::NotLoggedIn)?;
        let user = if self.sdk.user_exists(&keys.public_key).await? {
            self.sdk.get_user(&keys.public_key).await?
        } else {
            self.sdk.add_user(&keys.private_key).await?
        };

        self.registered = self.sdk.is_account_registered(&user.id).await?;
        self.sdk.await_synchronised(&user).await?;

        let eth = self.sdk.asset_id_by_symbol(ETH_SYMBOL)?;
        self.eth_balance = self.sdk.balance(&user.id, eth).await?;
        self.user = Some(user);

        info!(
            "user {} ready: registered={} balance={} ETH",
            user.id,
            self.registered,
            format_units(self.eth_balance, ETH_DECIMALS)
        );
        Ok(user)
    }

    /// Derive the spending keys and a signer for them.
    pub async fn generate_spending_key(&mut self) -> Result<PublicKey> {
        let keys = create_spending_key(&self.wallet, &self.sdk).await?;
        let signer = self
            .sdk
            .create_schnorr_signer(keys.private_key.clone())
            .await?;
        let public_key = keys.public_key;
        self.spending_keys = Some(keys);
        self.signer = Some(signer);
        Ok(public_key)
    }

    /// Register `alias` with the spending key, depositing `amount` ether.
    pub async fn register(&mut self, alias: &str, amount: &str) -> Result<TxId> {
        let keys = self.account_keys.as_ref().ok_or(SessionError::NotLoggedIn)?;
        let user = self.user.ok_or(SessionError::UserNotInitialised)?;
        let spending = self
            .spending_keys
            .as_ref()
            .ok_or(SessionError::NoSpendingKey)?;
        if self.registered {
            return Err(SessionError::AlreadyRegistered.into());
        }

        let recovery = self
            .sdk
            .create_schnorr_signer(random_private_key()?)
            .await?;

        let tx_id = register_account(
            &self.sdk,
            RegisterRequest {
                user_id: user.id,
                alias: alias.to_string(),
                account_private_key: keys.private_key.clone(),
                spending_public_key: spending.public_key,
                recovery_public_key: recovery.public_key(),
                token_address: EthAddress::ZERO,
                quantity: parse_ether(amount)?,
                settlement_time: self.settings.settlement_time,
                depositor: self.address,
            },
        )
        .await?;
        self.log_explorer_link(&tx_id);
        Ok(tx_id)
    }

    /// Deposit `amount` ether into the initialised account.
    pub async fn deposit(&mut self, amount: &str) -> Result<TxId> {
        self.account_keys.as_ref().ok_or(SessionError::NotLoggedIn)?;
        let user = self.user.ok_or(SessionError::UserNotInitialised)?;
        let tx_id = deposit_eth(
            &self.sdk,
            self.address,
            user.id,
            parse_ether(amount)?,
            self.settings.settlement_time,
        )
        .await?;
        self.log_explorer_link(&tx_id);
        Ok(tx_id)
    }

    /// Swap `amount` ether to wstETH through the configured bridge.
    pub async fn swap_eth_to_wsteth(&mut self, amount: &str) -> Result<TxId> {
        let user = self.user.ok_or(SessionError::UserNotInitialised)?;
        let signer = self.signer.as_ref().ok_or(SessionError::NoSpendingKey)?;

        let bridge_address_id = self
            .bridges
            .address_id(&self.settings.swap_bridge)
            .or(self.settings.swap_bridge_address_id)
            .ok_or_else(|| FlowError::UnknownBridge(self.settings.swap_bridge.clone()))?;

        let tx_id = defi_swap(
            &self.sdk,
            &user,
            signer,
            DefiSwapRequest {
                bridge_address_id,
                input_amount: parse_ether(amount)?,
                input_asset_a: ETH_SYMBOL.to_string(),
                output_asset_a: WSTETH_SYMBOL.to_string(),
                input_asset_b: None,
                output_asset_b: None,
                aux_data: self.settings.swap_min_output,
                settlement_time: self.settings.settlement_time,
            },
        )
        .await?;
        self.log_explorer_link(&tx_id);
        Ok(tx_id)
    }

    /// Prove membership of the user's `asset_symbol` note.
    pub async fn prove_note<P: NoteProver>(
        &self,
        prover: &P,
        asset_symbol: &str,
    ) -> Result<NoteProofOutcome> {
        let keys = self.account_keys.as_ref().ok_or(SessionError::NotLoggedIn)?;
        let user = self.user.ok_or(SessionError::UserNotInitialised)?;
        let asset_id = self.sdk.asset_id_by_symbol(&asset_symbol.to_uppercase())?;

        let request = NoteProofRequest {
            user_id: user.id,
            asset_id,
            account_private_key: keys.private_key.clone(),
            circuit_id: self.settings.circuit_id.clone(),
            proving_key_budget: self.settings.proving_key_budget,
        };
        let assembler = ProofInputAssembler::new(self.settings.tree_depth);
        generate_note_proof(&self.sdk, prover, &assembler, &request).await
    }

    /// The wallet switched accounts: drop all derived state.
    pub async fn accounts_changed(&mut self) -> Result<()> {
        let accounts = self.wallet.request_accounts().await?;
        let address = *accounts.first().ok_or(SessionError::NoWalletAccount)?;
        if address != self.address {
            warn!("wallet account changed: {} -> {}", self.address, address);
        }

        self.address = address;
        self.account_keys = None;
        self.user = None;
        self.registered = false;
        self.eth_balance = 0;
        self.spending_keys = None;
        self.signer = None;
        Ok(())
    }

    /// End the session and hand the wallet back.
    pub fn disconnect(self) -> W {
        info!("wallet disconnected: {}", self.address);
        self.wallet
    }

    pub fn explorer_link(&self, tx_id: &TxId) -> String {
        format!(
            "{}/tx/{}",
            self.settings.explorer_url.trim_end_matches('/'),
            tx_id
        )
    }

    fn log_explorer_link(&self, tx_id: &TxId) {
        info!("view transaction: {}", self.explorer_link(tx_id));
    }
}
