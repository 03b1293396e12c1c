use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{PendingTransactionBuilder, Provider};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolConstructor;
use async_trait::async_trait;
use attractor_core::AppError;

use crate::abi::{AttractorToken, Faucet};
use crate::artifact::Artifact;
use crate::client::FaucetApi;
use crate::provider::AttractorProvider;
use crate::revert::call_error;
use crate::tx::{Confirmation, Confirmed, confirm};

/// Chain-side steps of a contract creation.
///
/// Submission and confirmation are separate so callers can persist what they
/// know about a deployment before waiting on it.
#[async_trait]
pub trait ContractDeployer: Send + Sync {
    /// Account that signs and pays for the creation.
    fn deployer(&self) -> Address;

    /// Next nonce of the deployer, counting pending transactions.
    async fn next_nonce(&self) -> Result<u64, AppError>;

    /// Broadcast a creation transaction at `nonce` without waiting for it.
    async fn submit(&self, method: &'static str, code: Vec<u8>, nonce: u64)
    -> Result<TxHash, AppError>;

    /// Wait for a broadcast transaction to reach the confirmation policy.
    async fn wait(&self, method: &'static str, tx_hash: TxHash) -> Result<Confirmed, AppError>;
}

/// [`ContractDeployer`] sending through the wallet-backed provider.
pub struct ChainDeployer {
    provider: AttractorProvider,
    deployer: Address,
    policy: Confirmation,
}

impl ChainDeployer {
    pub fn new(provider: AttractorProvider, deployer: Address, policy: Confirmation) -> Self {
        Self {
            provider,
            deployer,
            policy,
        }
    }

    pub fn provider(&self) -> &AttractorProvider {
        &self.provider
    }
}

#[async_trait]
impl ContractDeployer for ChainDeployer {
    fn deployer(&self) -> Address {
        self.deployer
    }

    async fn next_nonce(&self) -> Result<u64, AppError> {
        self.provider
            .get_transaction_count(self.deployer)
            .pending()
            .await
            .map_err(|e| AppError::Rpc(format!("nonce of {}: {e}", self.deployer)))
    }

    async fn submit(
        &self,
        method: &'static str,
        code: Vec<u8>,
        nonce: u64,
    ) -> Result<TxHash, AppError> {
        let tx = TransactionRequest::default()
            .with_from(self.deployer)
            .with_nonce(nonce)
            .with_deploy_code(code);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| AppError::Rpc(format!("{method} failed: {e}")))?;
        Ok(*pending.tx_hash())
    }

    async fn wait(&self, method: &'static str, tx_hash: TxHash) -> Result<Confirmed, AppError> {
        let pending = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash);
        confirm(method, pending, self.policy).await
    }
}

/// A creation transaction that has been broadcast but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedDeployment {
    /// CREATE address derived from the deployer and nonce.
    pub address: Address,
    pub deployer: Address,
    pub nonce: u64,
    pub tx_hash: TxHash,
}

/// Confirmed faucet deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetDeployment {
    pub address: Address,
    pub deployer: Address,
    pub tx_hash: TxHash,
}

/// Configuration read back from a live faucet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetState {
    pub token: Address,
    pub portion: U256,
    pub owner: Address,
}

/// Confirmed companion-token deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDeployment {
    pub address: Address,
    pub tx_hash: TxHash,
    pub decimals: u8,
}

/// ABI-encoded faucet constructor arguments `(signer, token, portion)`.
pub fn faucet_constructor_args(signer: Address, token: Address, portion: U256) -> Vec<u8> {
    Faucet::constructorCall {
        signer,
        token,
        portion,
    }
    .abi_encode()
}

/// Deploy a faucet trusting `signer` and dispensing `portion` of `token`.
///
/// `on_submitted` runs as soon as the transaction is broadcast, before any
/// waiting. An error from it aborts the deployment without waiting, but the
/// transaction is already on its way.
pub async fn deploy_faucet<D, F>(
    deployer: &D,
    artifact: &Artifact,
    signer: Address,
    token: Address,
    portion: U256,
    on_submitted: F,
) -> Result<FaucetDeployment, AppError>
where
    D: ContractDeployer + ?Sized,
    F: FnOnce(&SubmittedDeployment) -> Result<(), AppError>,
{
    let code = artifact.deploy_code(&faucet_constructor_args(signer, token, portion));
    let (submitted, confirmed) = deploy("deploy Faucet", deployer, code, on_submitted).await?;
    Ok(FaucetDeployment {
        address: submitted.address,
        deployer: confirmed.from,
        tx_hash: confirmed.tx_hash,
    })
}

/// Read `token`, `portion` and `owner` of a faucet concurrently.
pub async fn faucet_state<F: FaucetApi + ?Sized>(faucet: &F) -> Result<FaucetState, AppError> {
    let (token, portion, owner) =
        tokio::try_join!(faucet.token(), faucet.portion(), faucet.owner())?;
    Ok(FaucetState {
        token,
        portion,
        owner,
    })
}

/// Deploy the companion ERC-20 minting `initial_supply` whole tokens to the deployer.
pub async fn deploy_token(
    deployer: &ChainDeployer,
    artifact: &Artifact,
    name: &str,
    symbol: &str,
    initial_supply: U256,
) -> Result<TokenDeployment, AppError> {
    let args = AttractorToken::constructorCall {
        name: name.to_string(),
        symbol: symbol.to_string(),
        initialSupply: initial_supply,
    }
    .abi_encode();
    let (submitted, confirmed) =
        deploy("deploy AttractorToken", deployer, artifact.deploy_code(&args), |_| Ok(())).await?;

    let decimals = AttractorToken::new(submitted.address, deployer.provider().clone())
        .decimals()
        .call()
        .await
        .map_err(|e| call_error("decimals", e))?;

    Ok(TokenDeployment {
        address: submitted.address,
        tx_hash: confirmed.tx_hash,
        decimals,
    })
}

async fn deploy<D, F>(
    method: &'static str,
    deployer: &D,
    code: Vec<u8>,
    on_submitted: F,
) -> Result<(SubmittedDeployment, Confirmed), AppError>
where
    D: ContractDeployer + ?Sized,
    F: FnOnce(&SubmittedDeployment) -> Result<(), AppError>,
{
    let from = deployer.deployer();
    let nonce = deployer.next_nonce().await?;
    let tx_hash = deployer.submit(method, code, nonce).await?;
    let submitted = SubmittedDeployment {
        address: from.create(nonce),
        deployer: from,
        nonce,
        tx_hash,
    };
    tracing::info!(method, address = %submitted.address, nonce, "Creation submitted");
    on_submitted(&submitted)?;

    let confirmed = deployer.wait(method, tx_hash).await?;
    match confirmed.contract_address {
        Some(created) if created == submitted.address => Ok((submitted, confirmed)),
        Some(created) => Err(AppError::Rpc(format!(
            "{method} created {created} instead of the expected {}",
            submitted.address
        ))),
        None => Err(AppError::Rpc(format!(
            "receipt of {tx_hash:#x} carries no contract address"
        ))),
    }
}
