use alloy::network::TransactionBuilder;
use alloy::primitives::utils::{ParseUnits, parse_units};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use attractor_core::AppError;

use crate::abi::ERC20;
use crate::provider::AttractorProvider;
use crate::revert::call_error;
use crate::tx::{Confirmation, confirm};

/// Decimals of the native coin.
pub const NATIVE_DECIMALS: u8 = 18;

/// Display metadata of an ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
}

/// How a faucet gets topped up, decided by the token it dispenses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingPlan {
    /// Plain value transfer of the native coin.
    Native { value: U256 },
    /// ERC-20 `transfer` scaled by the token's decimals.
    Token {
        token: Address,
        metadata: TokenMetadata,
        value: U256,
    },
}

impl FundingPlan {
    /// Pick the funding route for a faucet dispensing `token`.
    ///
    /// The zero address selects the native coin and ignores `metadata`. Any
    /// other token needs its metadata to scale `amount`.
    pub fn for_token(
        token: Address,
        amount: &str,
        metadata: Option<TokenMetadata>,
    ) -> Result<Self, AppError> {
        if token == Address::ZERO {
            return Self::native(amount);
        }
        let metadata = metadata.ok_or_else(|| {
            AppError::Config(format!("metadata of token {token} is required to fund"))
        })?;
        let value = parse_amount(amount, metadata.decimals)?;
        Ok(Self::Token {
            token,
            metadata,
            value,
        })
    }

    pub fn native(amount: &str) -> Result<Self, AppError> {
        Ok(Self::Native {
            value: parse_amount(amount, NATIVE_DECIMALS)?,
        })
    }

    pub fn value(&self) -> U256 {
        match self {
            Self::Native { value } | Self::Token { value, .. } => *value,
        }
    }

    /// Progress line announcing the transfer of `amount` to `faucet`.
    pub fn announcement(&self, faucet: Address, amount: &str) -> String {
        match self {
            Self::Native { .. } => format!("About to fund {faucet} with {amount} ATTRA"),
            Self::Token { metadata, .. } => format!(
                "About to fund {faucet} with {amount} {} ({})",
                metadata.symbol, metadata.name
            ),
        }
    }

    /// Send the planned transfer from the provider's account to `faucet`.
    pub async fn execute(
        &self,
        provider: &AttractorProvider,
        faucet: Address,
        policy: Confirmation,
    ) -> Result<TxHash, AppError> {
        match self {
            Self::Native { value } => send_native(provider, faucet, *value, policy).await,
            Self::Token { token, value, .. } => {
                send_token(provider, *token, faucet, *value, policy).await
            }
        }
    }
}

/// Build the [`FundingPlan`] for a faucet dispensing `token`, reading the
/// token's metadata only when it is an ERC-20.
pub async fn plan_funding(
    provider: &AttractorProvider,
    token: Address,
    amount: &str,
) -> Result<FundingPlan, AppError> {
    let metadata = if token == Address::ZERO {
        None
    } else {
        Some(token_metadata(provider, token).await?)
    };
    FundingPlan::for_token(token, amount, metadata)
}

/// Parse a human decimal amount (e.g. `"1.5"`) into base units.
///
/// Fractions finer than `decimals` are rejected rather than truncated.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, AppError> {
    let amount = amount.trim();
    let fraction_len = amount.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    if fraction_len > decimals as usize {
        return Err(AppError::Config(format!(
            "amount {amount:?} has more than {decimals} decimals"
        )));
    }
    match parse_units(amount, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(AppError::Config(format!(
            "amount must not be negative, got {amount:?}"
        ))),
        Err(e) => Err(AppError::Config(format!("invalid amount {amount:?}: {e}"))),
    }
}

/// Send native coin from the provider's account to `to`.
pub async fn send_native(
    provider: &AttractorProvider,
    to: Address,
    value: U256,
    policy: Confirmation,
) -> Result<TxHash, AppError> {
    let tx = TransactionRequest::default().with_to(to).with_value(value);
    let pending = provider
        .send_transaction(tx)
        .await
        .map_err(|e| AppError::Rpc(format!("native transfer failed: {e}")))?;
    Ok(confirm("transfer", pending, policy).await?.tx_hash)
}

/// Read `symbol`, `name` and `decimals` of an ERC-20 concurrently.
pub async fn token_metadata(
    provider: &AttractorProvider,
    token: Address,
) -> Result<TokenMetadata, AppError> {
    let erc20 = ERC20::new(token, provider.clone());
    let symbol = erc20.symbol();
    let name = erc20.name();
    let decimals = erc20.decimals();
    let (symbol, name, decimals) = tokio::try_join!(
        async { symbol.call().await.map_err(|e| call_error("symbol", e)) },
        async { name.call().await.map_err(|e| call_error("name", e)) },
        async { decimals.call().await.map_err(|e| call_error("decimals", e)) },
    )?;
    Ok(TokenMetadata {
        symbol,
        name,
        decimals,
    })
}

/// `transfer(to, amount)` on an ERC-20 from the provider's account.
pub async fn send_token(
    provider: &AttractorProvider,
    token: Address,
    to: Address,
    amount: U256,
    policy: Confirmation,
) -> Result<TxHash, AppError> {
    let erc20 = ERC20::new(token, provider.clone());
    let pending = erc20
        .transfer(to, amount)
        .send()
        .await
        .map_err(|e| call_error("transfer", e))?;
    Ok(confirm("transfer", pending, policy).await?.tx_hash)
}
