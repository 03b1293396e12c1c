use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::{Address, TxHash};
use alloy::providers::PendingTransactionBuilder;
use alloy::rpc::types::TransactionReceipt;
use attractor_core::{AppError, Settings};

/// How long and how deep to wait for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation {
    pub confirmations: u64,
    pub timeout: Duration,
}

impl Confirmation {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            confirmations: settings.min_confirmations,
            timeout: settings.tx_timeout,
        }
    }
}

/// Receipt summary of a confirmed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmed {
    pub tx_hash: TxHash,
    pub from: Address,
    pub contract_address: Option<Address>,
}

/// Wait for a submitted transaction to reach the required confirmations.
///
/// A receipt with a failed status is reported as a revert of `method`.
pub async fn confirm(
    method: &'static str,
    pending: PendingTransactionBuilder<Ethereum>,
    policy: Confirmation,
) -> Result<Confirmed, AppError> {
    let tx_hash = *pending.tx_hash();
    tracing::info!(
        method,
        tx = %tx_hash,
        confirmations = policy.confirmations,
        "Transaction submitted, waiting for confirmations"
    );

    let receipt: TransactionReceipt = pending
        .with_required_confirmations(policy.confirmations)
        .with_timeout(Some(policy.timeout))
        .get_receipt()
        .await
        .map_err(|e| AppError::Rpc(format!("{method} {tx_hash:#x} not confirmed: {e}")))?;

    if !receipt.status() {
        return Err(AppError::Revert {
            method,
            reason: format!("transaction {tx_hash:#x} failed on-chain"),
        });
    }

    tracing::debug!(method, tx = %tx_hash, block = ?receipt.block_number, "Transaction confirmed");

    Ok(Confirmed {
        tx_hash: receipt.transaction_hash,
        from: receipt.from,
        contract_address: receipt.contract_address,
    })
}
