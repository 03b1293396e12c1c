use std::time::Duration;

use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;

use crate::AppError;

pub const RPC_URL_ENV: &str = "ATTRA_TESTNET_URL";
pub const ACCOUNT_KEY_ENV: &str = "ACCOUNT_PRIV_KEY";
pub const MIN_CONFIRMATIONS_ENV: &str = "MIN_CONFIRMATIONS";
pub const FAUCET_SIGNER_KEY_ENV: &str = "FAUCET_SIGNER_PRIV_KEY";
pub const EXPLORER_API_KEY_ENV: &str = "EXPLORER_API_KEY";
pub const NETWORK_NAME_ENV: &str = "NETWORK_NAME";
pub const TX_TIMEOUT_ENV: &str = "TX_TIMEOUT_SECS";
pub const FAUCET_TOKEN_ADDRESS_ENV: &str = "FAUCET_TOKEN_ADDRESS";
pub const FAUCET_TOKEN_PORTION_ENV: &str = "FAUCET_TOKEN_PORTION";

/// Name of the Attractor test network the tooling targets by default.
pub const DEFAULT_NETWORK_NAME: &str = "attratest";

/// Chain id of the Attractor test network.
pub const ATTRA_TESTNET_CHAIN_ID: u64 = 9701;

const DEFAULT_TX_TIMEOUT_SECS: u64 = 300;

/// Application settings, validated once at startup.
///
/// Every required variable must be present and non-empty; the first missing
/// one is reported by name before any network interaction happens.
#[derive(Clone)]
pub struct Settings {
    /// Attractor RPC endpoint URL.
    pub rpc_url: String,

    /// Human-readable network name recorded in deployment files.
    pub network_name: String,

    /// Account paying for every transaction (deployer / owner / bank).
    pub account: PrivateKeySigner,

    /// Confirmations to wait for after every state-changing call.
    pub min_confirmations: u64,

    /// Key of the faucet's trusted signer, used to authorize dispenses.
    pub faucet_signer: PrivateKeySigner,

    /// Block-explorer API key.
    ///
    /// Required at startup so every command runs against a complete
    /// environment, even though no command talks to the explorer yet.
    pub explorer_api_key: String,

    /// Upper bound on waiting for a transaction to confirm.
    pub tx_timeout: Duration,
}

impl Settings {
    /// Load settings from environment variables (with optional `.env` file).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| -> Result<String, AppError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(AppError::MissingEnv(key))
        };

        let rpc_url = get(RPC_URL_ENV)?;
        let account = get(ACCOUNT_KEY_ENV)?;
        let min_confirmations = get(MIN_CONFIRMATIONS_ENV)?;
        let faucet_signer = get(FAUCET_SIGNER_KEY_ENV)?;
        let explorer_api_key = get(EXPLORER_API_KEY_ENV)?;

        let min_confirmations: u64 = min_confirmations.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "{MIN_CONFIRMATIONS_ENV} must be a positive integer, got {min_confirmations:?}"
            ))
        })?;
        if min_confirmations == 0 {
            return Err(AppError::Config(format!(
                "{MIN_CONFIRMATIONS_ENV} must be at least 1"
            )));
        }

        let tx_timeout_secs = match lookup(TX_TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                AppError::Config(format!("{TX_TIMEOUT_ENV} must be a number of seconds, got {raw:?}"))
            })?,
            None => DEFAULT_TX_TIMEOUT_SECS,
        };

        Ok(Self {
            rpc_url,
            network_name: lookup(NETWORK_NAME_ENV)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NETWORK_NAME.into()),
            account: parse_key(ACCOUNT_KEY_ENV, &account)?,
            min_confirmations,
            faucet_signer: parse_key(FAUCET_SIGNER_KEY_ENV, &faucet_signer)?,
            explorer_api_key,
            tx_timeout: Duration::from_secs(tx_timeout_secs),
        })
    }
}

/// Settings only the `deploy` command needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploySettings {
    /// Token the faucet dispenses; the zero address means the native coin.
    pub token: Address,

    /// Amount dispensed per request, in the token's base units.
    pub portion: U256,
}

impl DeploySettings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(FAUCET_TOKEN_ADDRESS_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::MissingEnv(FAUCET_TOKEN_ADDRESS_ENV))?;
        let portion = lookup(FAUCET_TOKEN_PORTION_ENV)
            .filter(|v| !v.trim().is_empty())
            .ok_or(AppError::MissingEnv(FAUCET_TOKEN_PORTION_ENV))?;

        Ok(Self {
            token: parse_address(FAUCET_TOKEN_ADDRESS_ENV, &token)?,
            portion: portion.trim().parse().map_err(|_| {
                AppError::Config(format!(
                    "{FAUCET_TOKEN_PORTION_ENV} must be an unsigned integer, got {portion:?}"
                ))
            })?,
        })
    }
}

/// Parse an address. Mixed-case input must carry a valid EIP-55 checksum.
pub fn parse_address(name: &str, raw: &str) -> Result<Address, AppError> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
        && digits.chars().any(|c| c.is_ascii_lowercase());

    let parsed = if mixed_case {
        Address::parse_checksummed(format!("0x{digits}"), None).map_err(|e| e.to_string())
    } else {
        digits.parse::<Address>().map_err(|e| e.to_string())
    };
    parsed.map_err(|e| AppError::Config(format!("{name} is not a valid address ({raw:?}): {e}")))
}

/// Parse a hex private key (with or without `0x`).
pub fn parse_key(name: &str, raw: &str) -> Result<PrivateKeySigner, AppError> {
    let key = raw.trim();
    let key = key.strip_prefix("0x").unwrap_or(key);
    key.parse()
        .map_err(|e| AppError::Config(format!("{name} is not a valid private key: {e}")))
}
