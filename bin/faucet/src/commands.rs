use std::path::Path;

use alloy::hex;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use alloy::providers::Provider;
use alloy::signers::local::PrivateKeySigner;
use attractor_core::config::{ATTRA_TESTNET_CHAIN_ID, DEFAULT_NETWORK_NAME, DeploySettings};
use attractor_core::{AppError, Settings};
use attractor_faucet::artifact::Artifact;
use attractor_faucet::deploy::{
    self, ChainDeployer, ContractDeployer, FaucetDeployment, FaucetState, SubmittedDeployment,
};
use attractor_faucet::funding::{self, FundingPlan};
use attractor_faucet::provider::AttractorProvider;
use attractor_faucet::{Confirmation, DISPENSE_WINDOW, FaucetApi, FaucetClient, FaucetInfo};
use attractor_storage::{DeploymentRecord, FaucetRecord, NetworkRecord, SignerRecord, save_record};
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr};

use crate::Command;

/// Execute a single CLI command.
pub async fn run(command: Command, settings: &Settings, provider: &AttractorProvider) -> Result<()> {
    let policy = Confirmation::from_settings(settings);
    let faucet_at = |address: Address| FaucetClient::new(address, provider.clone(), policy);

    match command {
        Command::Info { address } => info(&faucet_at(address)).await,
        Command::Fund { address, amount } => {
            fund(&faucet_at(address), provider, &amount, policy).await
        }
        Command::FundCoin { address, amount } => fund_coin(provider, address, &amount, policy).await,
        Command::Trust { address, signer } => trust(&faucet_at(address), signer).await,
        Command::Retrust { address } => retrust(&faucet_at(address)).await,
        Command::Transfer { address, owner } => transfer(&faucet_at(address), owner).await,
        Command::Flush { address } => flush(&faucet_at(address)).await,
        Command::Dispense {
            address,
            recipient,
            identity,
        } => dispense(&faucet_at(address), &settings.faucet_signer, recipient, &identity).await,
        Command::Deploy { artifact, out_dir } => {
            deploy_faucet(settings, provider, &artifact, &out_dir, policy).await
        }
        Command::DeployToken {
            artifact,
            name,
            symbol,
            supply,
        } => {
            let deployer = settings.account.address();
            deploy_token(provider, deployer, &artifact, &name, &symbol, supply, policy).await
        }
    }
}

async fn info(faucet: &impl FaucetApi) -> Result<()> {
    for line in FaucetInfo::fetch(faucet).await?.lines() {
        println!("{line}");
    }
    Ok(())
}

async fn fund(
    faucet: &impl FaucetApi,
    provider: &AttractorProvider,
    amount: &str,
    policy: Confirmation,
) -> Result<()> {
    let address = faucet.address();
    let token = faucet.token().await?;
    let plan = funding::plan_funding(provider, token, amount).await?;

    println!("{}", plan.announcement(address, amount));
    let tx_hash = plan.execute(provider, address, policy).await?;

    println!("Transaction hash is {tx_hash}");
    println!("Successfully funded!");
    Ok(())
}

async fn fund_coin(
    provider: &AttractorProvider,
    address: Address,
    amount: &str,
    policy: Confirmation,
) -> Result<()> {
    let plan = FundingPlan::native(amount)?;
    println!("{}", plan.announcement(address, amount));
    let tx_hash = plan.execute(provider, address, policy).await?;
    println!("Transaction hash is {tx_hash}");
    println!("Successfully funded with ATTRA!");
    Ok(())
}

async fn trust(faucet: &impl FaucetApi, signer: Address) -> Result<()> {
    println!("About to transfer trust of {} to {signer}", faucet.address());
    let tx_hash = faucet.trust(signer).await?;
    println!("Transaction hash is {tx_hash}");
    println!("Job is done.");
    Ok(())
}

async fn retrust(faucet: &impl FaucetApi) -> Result<()> {
    let wallet = PrivateKeySigner::random();
    println!(
        "Signer private key is {}",
        hex::encode_prefixed(wallet.to_bytes())
    );
    trust(faucet, wallet.address()).await
}

async fn transfer(faucet: &impl FaucetApi, owner: Address) -> Result<()> {
    println!("About to transfer ownership of {} to {owner}", faucet.address());
    let tx_hash = faucet.transfer_ownership(owner).await?;
    println!("Transaction hash is {tx_hash}");
    println!("Transfer confirmed. Job is done!");
    Ok(())
}

async fn flush(faucet: &impl FaucetApi) -> Result<()> {
    println!("About to flush tokens from {}", faucet.address());
    let tx_hash = faucet.flush().await?;
    println!("Transaction hash is {tx_hash}");
    println!("Flush confirmed. The job is done!");
    Ok(())
}

async fn dispense(
    faucet: &impl FaucetApi,
    signer: &PrivateKeySigner,
    recipient: Address,
    identity: &str,
) -> Result<()> {
    println!(
        "About to dispense tokens from {} to {recipient}",
        faucet.address()
    );
    let now = u64::try_from(Utc::now().timestamp())
        .map_err(|_| AppError::Config("system clock is before the Unix epoch".to_string()))?;

    let receipt =
        attractor_faucet::dispense(faucet, signer, recipient, identity, DISPENSE_WINDOW, now)
            .await?;

    println!("Authorization digest is {}", receipt.digest);
    println!("Transaction hash is {}", receipt.tx_hash);
    println!("Dispension confirmed. Job is done!");
    Ok(())
}

async fn deploy_faucet(
    settings: &Settings,
    provider: &AttractorProvider,
    artifact: &Path,
    out_dir: &Path,
    policy: Confirmation,
) -> Result<()> {
    let checkpoint = Utc::now();
    let params = DeploySettings::from_env()?;
    let artifact = Artifact::load(artifact)?;

    let deployer = settings.account.address();
    println!("About to deploy {} from {deployer}", artifact.contract_name);
    let (balance, chain_id) = tokio::try_join!(
        async { provider.get_balance(deployer).await },
        async { provider.get_chain_id().await },
    )
    .wrap_err("failed to query deployer balance")?;
    println!("Deployer balance is {}", format_ether(balance));

    if settings.network_name == DEFAULT_NETWORK_NAME && chain_id != ATTRA_TESTNET_CHAIN_ID {
        tracing::warn!(
            chain_id,
            expected = ATTRA_TESTNET_CHAIN_ID,
            network = %settings.network_name,
            "RPC chain id does not match the configured network"
        );
    }

    let signer = PrivateKeySigner::random();
    tracing::info!(signer = %signer.address(), "Generated trusted signer");

    let network = NetworkRecord {
        name: settings.network_name.clone(),
        chain_id,
    };
    let chain = ChainDeployer::new(provider.clone(), deployer, policy);
    let deployment =
        deploy_and_record(&chain, &artifact, &signer, &params, network, out_dir, checkpoint)
            .await?;
    println!("Faucet deployed to {}", deployment.address);

    let faucet = FaucetClient::new(deployment.address, provider.clone(), policy);
    let state = deploy::faucet_state(&faucet).await?;
    let recorded = FaucetState {
        token: params.token,
        portion: params.portion,
        owner: deployment.deployer,
    };
    if state != recorded {
        tracing::warn!(?state, ?recorded, "Live faucet differs from its deployment record");
    }

    println!("The job is done :)");
    Ok(())
}

/// Deploy the faucet and persist its record as soon as the creation is
/// broadcast, so the trusted key survives a failed or abandoned wait.
async fn deploy_and_record<D: ContractDeployer + ?Sized>(
    chain: &D,
    artifact: &Artifact,
    signer: &PrivateKeySigner,
    params: &DeploySettings,
    network: NetworkRecord,
    out_dir: &Path,
    checkpoint: DateTime<Utc>,
) -> Result<FaucetDeployment, AppError> {
    deploy::deploy_faucet(
        chain,
        artifact,
        signer.address(),
        params.token,
        params.portion,
        |submitted| {
            println!("Transaction hash is {}", submitted.tx_hash);
            println!("Saving info...");
            let record = deployment_record(network, submitted, params, signer);
            match save_record(out_dir, checkpoint, &record) {
                Ok(path) => {
                    println!("Deployment info has been saved to {}", path.display());
                    Ok(())
                }
                Err(e) => {
                    // The creation is already broadcast; stdout is the only copy left.
                    println!(
                        "Faucet {} trusts signer {} with private key {}",
                        record.faucet.address,
                        record.faucet.signer.address,
                        record.faucet.signer.private_key
                    );
                    Err(e)
                }
            }
        },
    )
    .await
}

/// Record of a faucet whose creation has been broadcast.
///
/// The owner is the deployer, as set by the constructor.
fn deployment_record(
    network: NetworkRecord,
    submitted: &SubmittedDeployment,
    params: &DeploySettings,
    signer: &PrivateKeySigner,
) -> DeploymentRecord {
    DeploymentRecord {
        faucet: FaucetRecord {
            network,
            address: submitted.address.to_string(),
            token: params.token.to_string(),
            portion: params.portion.to_string(),
            deployer: submitted.deployer.to_string(),
            owner: submitted.deployer.to_string(),
            signer: SignerRecord {
                address: signer.address().to_string(),
                private_key: hex::encode_prefixed(signer.to_bytes()),
            },
        },
    }
}

async fn deploy_token(
    provider: &AttractorProvider,
    deployer: Address,
    artifact: &Path,
    name: &str,
    symbol: &str,
    supply: U256,
    policy: Confirmation,
) -> Result<()> {
    let artifact = Artifact::load(artifact)?;
    println!("Deploying {} {name} ({symbol})", artifact.contract_name);

    let chain = ChainDeployer::new(provider.clone(), deployer, policy);
    let deployment = deploy::deploy_token(&chain, &artifact, name, symbol, supply).await?;
    println!("Transaction hash is {}", deployment.tx_hash);
    println!("Token deployed to: {}", deployment.address);
    println!("Token name: {name}");
    println!("Token symbol: {symbol}");
    println!("Initial supply: {supply} tokens");
    println!("Decimals: {}", deployment.decimals);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use alloy::primitives::{TxHash, address, keccak256};
    use async_trait::async_trait;
    use attractor_faucet::tx::Confirmed;
    use attractor_storage::{load_record, record_file_name};

    const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const NONCE: u64 = 3;

    /// Accepts the creation but never confirms it.
    #[derive(Default)]
    struct StalledChain {
        waited: AtomicBool,
    }

    #[async_trait]
    impl ContractDeployer for StalledChain {
        fn deployer(&self) -> Address {
            DEPLOYER
        }

        async fn next_nonce(&self) -> Result<u64, AppError> {
            Ok(NONCE)
        }

        async fn submit(
            &self,
            _method: &'static str,
            _code: Vec<u8>,
            _nonce: u64,
        ) -> Result<TxHash, AppError> {
            Ok(keccak256(b"faucet creation"))
        }

        async fn wait(&self, method: &'static str, tx_hash: TxHash) -> Result<Confirmed, AppError> {
            self.waited.store(true, Ordering::SeqCst);
            Err(AppError::Rpc(format!(
                "{method} {tx_hash:#x} not confirmed: transaction was not confirmed within the timeout"
            )))
        }
    }

    fn artifact() -> Artifact {
        Artifact::from_json(r#"{"contractName": "Faucet", "bytecode": "0x6080604052"}"#).unwrap()
    }

    fn params() -> DeploySettings {
        DeploySettings {
            token: Address::ZERO,
            portion: U256::from(1_000_000_000_000_000_000u128),
        }
    }

    fn network() -> NetworkRecord {
        NetworkRecord {
            name: DEFAULT_NETWORK_NAME.to_string(),
            chain_id: ATTRA_TESTNET_CHAIN_ID,
        }
    }

    #[tokio::test]
    async fn record_survives_a_confirmation_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let chain = StalledChain::default();
        let signer = PrivateKeySigner::random();
        let checkpoint = Utc::now();

        let err = deploy_and_record(
            &chain,
            &artifact(),
            &signer,
            &params(),
            network(),
            dir.path(),
            checkpoint,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Rpc(_)));
        assert!(chain.waited.load(Ordering::SeqCst));

        let record = load_record(&dir.path().join(record_file_name(checkpoint))).unwrap();
        let faucet = record.faucet;
        assert_eq!(faucet.address, DEPLOYER.create(NONCE).to_string());
        assert_eq!(faucet.deployer, DEPLOYER.to_string());
        assert_eq!(faucet.owner, DEPLOYER.to_string());
        assert_eq!(faucet.token, Address::ZERO.to_string());
        assert_eq!(faucet.portion, "1000000000000000000");
        assert_eq!(faucet.network, network());
        assert_eq!(faucet.signer.address, signer.address().to_string());
        assert_eq!(
            faucet.signer.private_key,
            hex::encode_prefixed(signer.to_bytes())
        );
    }

    #[tokio::test]
    async fn unwritable_record_stops_before_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = Utc::now();
        std::fs::write(dir.path().join(record_file_name(checkpoint)), "{}").unwrap();
        let chain = StalledChain::default();

        let err = deploy_and_record(
            &chain,
            &artifact(),
            &PrivateKeySigner::random(),
            &params(),
            network(),
            dir.path(),
            checkpoint,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Io(ref e) if e.kind() == std::io::ErrorKind::AlreadyExists));
        assert!(!chain.waited.load(Ordering::SeqCst));
    }

    #[test]
    fn record_names_the_predicted_faucet_address() {
        let signer = PrivateKeySigner::random();
        let submitted = SubmittedDeployment {
            address: DEPLOYER.create(0),
            deployer: DEPLOYER,
            nonce: 0,
            tx_hash: keccak256(b"faucet creation"),
        };

        let record = deployment_record(network(), &submitted, &params(), &signer);
        assert_eq!(
            record.faucet.address,
            "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        );
    }
}
