use shade_transaction::TxSettlementTime;
use thiserror::Error;

/// Precondition failures in the transaction flows
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Alias must not be empty")]
    EmptyAlias,

    #[error("No fee quote for settlement time {0:?}")]
    MissingFeeQuote(TxSettlementTime),

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: u128, requested: u128 },

    #[error("Unknown bridge: {0}")]
    UnknownBridge(String),
}

/// A session handler was called before the state it needs exists
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Wallet exposes no accounts")]
    NoWalletAccount,

    #[error("Not logged in (no account keys)")]
    NotLoggedIn,

    #[error("Rollup user not initialised")]
    UserNotInitialised,

    #[error("No spending key generated")]
    NoSpendingKey,

    #[error("Account is already registered")]
    AlreadyRegistered,
}
