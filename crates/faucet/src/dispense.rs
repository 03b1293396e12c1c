use std::time::Duration;

use alloy::primitives::{Address, B256, TxHash};
use alloy::signers::SignerSync;
use attractor_core::AppError;

use crate::authorization::{Actor, authorization_digest, authorize, deadline_from_now};
use crate::client::FaucetApi;
use crate::identity::hash_identity;

/// Validity window of authorizations issued by the CLI.
pub const DISPENSE_WINDOW: Duration = Duration::from_secs(20 * 60);

/// Outcome of a confirmed dispense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispenseReceipt {
    pub tx_hash: TxHash,
    pub actor: Actor,
    pub deadline: u64,
    /// Message digest the authorization was signed over.
    pub digest: B256,
}

/// Authorize and submit a dispense of the faucet's portion to `recipient`.
///
/// The deadline is fixed once at `now + window` and the signature is bound to
/// `(recipient, hash_identity(identity), faucet, deadline)`. Failures of the
/// contract call are returned as-is; nothing is retried.
pub async fn dispense<F, S>(
    faucet: &F,
    signer: &S,
    recipient: Address,
    identity: &str,
    window: Duration,
    now: u64,
) -> Result<DispenseReceipt, AppError>
where
    F: FaucetApi + ?Sized,
    S: SignerSync + ?Sized,
{
    let actor = Actor::new(recipient, hash_identity(identity));
    let deadline = deadline_from_now(now, window)?;
    let digest = authorization_digest(&actor, faucet.address(), deadline);

    tracing::info!(
        faucet = %faucet.address(),
        recipient = %recipient,
        name = %actor.name,
        deadline,
        digest = %digest,
        "Authorizing dispense"
    );

    let signature = authorize(&actor, faucet.address(), deadline, signer)?;
    let tx_hash = faucet.dispense(&actor, &signature, deadline).await?;

    Ok(DispenseReceipt {
        tx_hash,
        actor,
        deadline,
        digest,
    })
}
