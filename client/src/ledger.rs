//! Ledger and rollup SDK seams
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ LedgerClient                 │  notes + tree root (public accessors)
//! └──────────────▲───────────────┘
//!                │ supertrait
//! ┌──────────────┴───────────────┐        ┌──────────────────────┐
//! │ RollupSdk                    │ ─────► │ TxController         │
//! │ assets, fees, users, keys    │ create │ proof, sign, deposit │
//! └──────────────────────────────┘        │ send → TxId          │
//!                                         └──────────────────────┘
//! ```
//!
//! Hash paths and roots are only read through these accessors, never from
//! SDK-internal state.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shade_account::{EthAddress, PrivateKey, PublicKey, SchnorrSigner};
use shade_privacy::Note;
use shade_transaction::{AssetId, AssetValue, BridgeCallData, TxId};

// ============================================================================
// Ledger
// ============================================================================

/// Rollup chain status as reported by the rollup server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainStatus {
    /// Root of the note commitment tree
    #[serde(with = "shade_account::hex0x::array")]
    pub data_root: [u8; 32],
    /// Number of leaves in the commitment tree
    #[serde(default)]
    pub data_size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStatus {
    pub blockchain_status: BlockchainStatus,
}

/// Read access to notes and the commitment tree
#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// A note of `asset_id` owned by `user_id`. Index and hash path are
    /// absent while the note is pending.
    async fn get_note_by_asset(&self, user_id: &PublicKey, asset_id: AssetId) -> Result<Note>;

    /// Current rollup status, including the commitment tree root.
    async fn get_remote_status(&self) -> Result<RemoteStatus>;
}

// ============================================================================
// SDK
// ============================================================================

/// A rollup account loaded into the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkUser {
    pub id: PublicKey,
}

/// Step-wise builder for one rollup transaction.
///
/// Flows call the steps in a fixed order; not every flow uses every step.
#[allow(async_fn_in_trait)]
pub trait TxController {
    async fn create_proof(&mut self) -> Result<()>;
    async fn sign(&mut self) -> Result<()>;
    /// Funds already deposited to the rollup contract for this depositor
    async fn pending_funds(&self) -> Result<u128>;
    async fn deposit_funds_to_contract(&mut self) -> Result<()>;
    async fn await_deposit_funds_to_contract(&mut self) -> Result<()>;
    async fn send(&mut self) -> Result<TxId>;
}

#[derive(Debug, Clone)]
pub struct DepositParams {
    pub depositor: EthAddress,
    pub value: AssetValue,
    pub fee: AssetValue,
    pub recipient: PublicKey,
    pub recipient_spending_key_required: bool,
}

#[derive(Debug, Clone)]
pub struct RegisterParams {
    pub user_id: PublicKey,
    pub alias: String,
    pub account_private_key: PrivateKey,
    pub spending_public_key: PublicKey,
    pub recovery_public_key: PublicKey,
    pub deposit: AssetValue,
    pub fee: AssetValue,
    pub depositor: EthAddress,
}

#[derive(Debug, Clone)]
pub struct DefiParams {
    pub user_id: PublicKey,
    pub signer: SchnorrSigner,
    pub bridge_call_data: BridgeCallData,
    pub value: AssetValue,
    pub fee: AssetValue,
}

/// The rollup SDK as used by the client flows
#[allow(async_fn_in_trait)]
pub trait RollupSdk: LedgerClient {
    type Controller: TxController;

    /// Start syncing with the rollup server.
    async fn run(&self) -> Result<()>;

    async fn derive_public_key(&self, private_key: &PrivateKey) -> Result<PublicKey>;
    async fn create_schnorr_signer(&self, private_key: PrivateKey) -> Result<SchnorrSigner>;

    fn asset_id_by_symbol(&self, symbol: &str) -> Result<AssetId>;
    fn asset_id_by_address(&self, address: &EthAddress) -> Result<AssetId>;

    /// Fee quotes, indexed by `TxSettlementTime::index`
    async fn deposit_fees(&self, asset_id: AssetId) -> Result<Vec<AssetValue>>;
    async fn register_fees(&self, asset_id: AssetId) -> Result<Vec<AssetValue>>;
    async fn defi_fees(&self, bridge_call_data: &BridgeCallData) -> Result<Vec<AssetValue>>;

    async fn user_exists(&self, user_id: &PublicKey) -> Result<bool>;
    async fn get_user(&self, user_id: &PublicKey) -> Result<SdkUser>;
    async fn add_user(&self, account_private_key: &PrivateKey) -> Result<SdkUser>;
    async fn is_account_registered(&self, user_id: &PublicKey) -> Result<bool>;
    /// Wait until the SDK has read and decrypted the user's notes.
    async fn await_synchronised(&self, user: &SdkUser) -> Result<()>;
    async fn balance(&self, user_id: &PublicKey, asset_id: AssetId) -> Result<u128>;

    fn create_deposit_controller(&self, params: DepositParams) -> Self::Controller;
    async fn create_register_controller(&self, params: RegisterParams)
    -> Result<Self::Controller>;
    fn create_defi_controller(&self, params: DefiParams) -> Self::Controller;
}
