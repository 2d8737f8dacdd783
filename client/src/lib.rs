//! Shade rollup client
//!
//! Drives a rollup SDK and an L1 wallet through the account flows
//! (login, register, deposit, DeFi swap) and produces note membership
//! proofs from ledger data.
//!
//! The SDK, wallet and prover are seams (`RollupSdk`, `WalletSigner`,
//! `NoteProver`); `Session` holds the state between user actions.

pub mod bridges;
pub mod error;
pub mod flows;
pub mod http_prover;
pub mod keys;
pub mod ledger;
pub mod note_proof;
pub mod session;
pub mod wallet;


pub use bridges::{BridgeData, BridgeDataProvider, BridgeRegistry, StaticBridgeData};
pub use error::{FlowError, SessionError};
pub use flows::{
    DefiSwapRequest, ETH_SYMBOL, RegisterRequest, defi_swap, deposit_eth, register_account,
};
pub use http_prover::{HttpProver, HttpProverConfig};
pub use ledger::{
    BlockchainStatus, DefiParams, DepositParams, LedgerClient, RegisterParams, RemoteStatus,
    RollupSdk, SdkUser, TxController,
};
pub use note_proof::{NoteProofOutcome, NoteProofRequest, generate_note_proof};
pub use session::{Session, SessionSettings, WSTETH_SYMBOL};
pub use wallet::{DevWallet, WalletSigner};
