//! Attractor Faucet CLI: deploys and administers faucet contracts.
//!
//! Flow:
//! 1. Load and validate settings from the environment (`.env` supported)
//! 2. Connect a wallet-backed provider for the funding account
//! 3. Run one command, waiting `MIN_CONFIRMATIONS` for every transaction
//!
//! Any failure (missing configuration, revert, I/O) is reported and the
//! process exits non-zero. Nothing is retried.

mod commands;

use std::path::PathBuf;

use alloy::primitives::{Address, U256};
use attractor_core::{Settings, telemetry};
use attractor_faucet::artifact::{FAUCET_ARTIFACT, TOKEN_ARTIFACT};
use attractor_faucet::provider;
use attractor_storage::DEFAULT_RECORD_DIR;
use clap::{Parser, Subcommand};
use eyre::Result;

/// Operate Attractor faucet contracts
#[derive(Parser, Debug)]
#[command(name = "faucet", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Get information about specified faucet
    Info {
        /// Address of the faucet
        address: Address,
    },

    /// Move funds to specified faucet
    Fund {
        /// Address of faucet to send funds to
        address: Address,
        /// Amount of tokens to send, in whole units
        amount: String,
    },

    /// Fund faucet with native coins
    #[command(alias = "fundCoin")]
    FundCoin {
        /// Address of faucet to fund
        address: Address,
        /// Amount of native coin to send
        amount: String,
    },

    /// Set trusted signer of a faucet
    Trust {
        /// Address of faucet to change
        address: Address,
        /// Address of trusted signer
        signer: Address,
    },

    /// Generate and set new trusted signer of a faucet
    Retrust {
        /// Address of faucet to change
        address: Address,
    },

    /// Transfer ownership of a faucet
    Transfer {
        /// Address of faucet to transfer
        address: Address,
        /// New owner
        owner: Address,
    },

    /// Flush all dispensable tokens from a faucet
    Flush {
        /// Address of faucet to interact with
        address: Address,
    },

    /// Dispense tokens from a faucet
    Dispense {
        /// Address of faucet to trigger
        address: Address,
        /// Account to receive tokens
        recipient: Address,
        /// Account identity, e.g. ip-address
        identity: String,
    },

    /// Deploy a new faucet with a freshly generated trusted signer
    Deploy {
        /// Hardhat artifact of the faucet contract
        #[arg(long, default_value = FAUCET_ARTIFACT)]
        artifact: PathBuf,
        /// Directory the deployment record is written to
        #[arg(long, default_value = DEFAULT_RECORD_DIR)]
        out_dir: PathBuf,
    },

    /// Deploy the Attractor ERC-20 token
    DeployToken {
        /// Hardhat artifact of the token contract
        #[arg(long, default_value = TOKEN_ARTIFACT)]
        artifact: PathBuf,
        #[arg(long, default_value = "Attractor")]
        name: String,
        #[arg(long, default_value = "ATTRA")]
        symbol: String,
        /// Initial supply in whole tokens
        #[arg(long, default_value = "1000000000")]
        supply: U256,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Initialisation ──────────────────────────────────────────────────
    telemetry::init();
    let settings = Settings::from_env()?;

    tracing::debug!(
        rpc = %settings.rpc_url,
        network = %settings.network_name,
        account = %settings.account.address(),
        confirmations = settings.min_confirmations,
        "Settings loaded"
    );

    let provider = provider::create_provider(&settings.rpc_url, settings.account.clone())?;

    commands::run(cli.command, &settings, &provider).await
}
