//! Transaction flows
//!
//! Each flow fetches a fee quote, builds a controller through the SDK and
//! drives its steps in the order the rollup expects:
//!
//! ```text
//! deposit : create_proof → sign → [deposit_funds → await_deposit] → send
//! register: deposit_funds → await_deposit → create_proof → sign → send
//! defi    : create_proof → send
//! ```

use anyhow::Result;
use shade_account::{EthAddress, PrivateKey, PublicKey, SchnorrSigner};
use shade_transaction::{AssetValue, BridgeCallData, TxId, TxSettlementTime};
use tracing::{debug, info};

use crate::error::FlowError;
use crate::ledger::{
    DefiParams, DepositParams, RegisterParams, RollupSdk, SdkUser, TxController,
};

/// Symbol of the rollup's native asset
pub const ETH_SYMBOL: &str = "ETH";

fn pick_fee(quotes: &[AssetValue], settlement_time: TxSettlementTime) -> Result<AssetValue> {
    Ok(settlement_time
        .select(quotes)
        .ok_or(FlowError::MissingFeeQuote(settlement_time))?)
}

/// Deposit ETH from an L1 account into a rollup account.
pub async fn deposit_eth<S: RollupSdk>(
    sdk: &S,
    depositor: EthAddress,
    recipient: PublicKey,
    quantity: u128,
    settlement_time: TxSettlementTime,
) -> Result<TxId> {
    if quantity == 0 {
        return Err(FlowError::ZeroAmount.into());
    }

    let asset_id = sdk.asset_id_by_symbol(ETH_SYMBOL)?;
    let fee = pick_fee(&sdk.deposit_fees(asset_id).await?, settlement_time)?;

    let mut controller = sdk.create_deposit_controller(DepositParams {
        depositor,
        value: AssetValue::new(asset_id, quantity),
        fee,
        recipient,
        recipient_spending_key_required: true,
    });

    controller.create_proof().await?;
    controller.sign().await?;

    let pending = controller.pending_funds().await?;
    debug!("pending funds {} for depositor {}", pending, depositor);
    if pending < quantity {
        controller.deposit_funds_to_contract().await?;
        controller.await_deposit_funds_to_contract().await?;
    }

    let tx_id = controller.send().await?;
    info!("deposit sent: {}", tx_id);
    Ok(tx_id)
}

/// Everything needed to register an alias for an account.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub user_id: PublicKey,
    pub alias: String,
    pub account_private_key: PrivateKey,
    pub spending_public_key: PublicKey,
    pub recovery_public_key: PublicKey,
    pub token_address: EthAddress,
    pub quantity: u128,
    pub settlement_time: TxSettlementTime,
    pub depositor: EthAddress,
}

/// Register an alias and spending key, paying the fee from an L1 deposit.
pub async fn register_account<S: RollupSdk>(sdk: &S, request: RegisterRequest) -> Result<TxId> {
    if request.alias.trim().is_empty() {
        return Err(FlowError::EmptyAlias.into());
    }

    let asset_id = sdk.asset_id_by_address(&request.token_address)?;
    let fee = pick_fee(
        &sdk.register_fees(asset_id).await?,
        request.settlement_time,
    )?;

    let mut controller = sdk
        .create_register_controller(RegisterParams {
            user_id: request.user_id,
            alias: request.alias,
            account_private_key: request.account_private_key,
            spending_public_key: request.spending_public_key,
            recovery_public_key: request.recovery_public_key,
            deposit: AssetValue::new(asset_id, request.quantity),
            fee,
            depositor: request.depositor,
        })
        .await?;

    controller.deposit_funds_to_contract().await?;
    controller.await_deposit_funds_to_contract().await?;
    controller.create_proof().await?;
    controller.sign().await?;

    let tx_id = controller.send().await?;
    info!("registration sent: {}", tx_id);
    Ok(tx_id)
}

/// A bridge interaction; the B legs are optional.
#[derive(Debug, Clone)]
pub struct DefiSwapRequest {
    pub bridge_address_id: u32,
    pub input_amount: u128,
    pub input_asset_a: String,
    pub output_asset_a: String,
    pub input_asset_b: Option<String>,
    pub output_asset_b: Option<String>,
    pub aux_data: u64,
    pub settlement_time: TxSettlementTime,
}

/// Send value through a DeFi bridge.
pub async fn defi_swap<S: RollupSdk>(
    sdk: &S,
    user: &SdkUser,
    signer: &SchnorrSigner,
    request: DefiSwapRequest,
) -> Result<TxId> {
    if request.input_amount == 0 {
        return Err(FlowError::ZeroAmount.into());
    }

    let lookup = |symbol: &str| sdk.asset_id_by_symbol(&symbol.to_uppercase());
    let input_asset_a = lookup(&request.input_asset_a)?;
    let output_asset_a = lookup(&request.output_asset_a)?;
    let input_asset_b = request.input_asset_b.as_deref().map(lookup).transpose()?;
    let output_asset_b = request.output_asset_b.as_deref().map(lookup).transpose()?;

    let available = sdk.balance(&user.id, input_asset_a).await?;
    if available < request.input_amount {
        return Err(FlowError::InsufficientBalance {
            available,
            requested: request.input_amount,
        }
        .into());
    }

    let bridge_call_data = BridgeCallData::new(
        request.bridge_address_id,
        input_asset_a,
        output_asset_a,
        input_asset_b,
        output_asset_b,
        request.aux_data,
    );
    let fee = pick_fee(
        &sdk.defi_fees(&bridge_call_data).await?,
        request.settlement_time,
    )?;

    let mut controller = sdk.create_defi_controller(DefiParams {
        user_id: user.id,
        signer: signer.clone(),
        bridge_call_data,
        value: AssetValue::new(input_asset_a, request.input_amount),
        fee,
    });

    controller.create_proof().await?;
    let tx_id = controller.send().await?;
    info!(
        "defi interaction sent via bridge {}: {}",
        request.bridge_address_id, tx_id
    );
    Ok(tx_id)
}
