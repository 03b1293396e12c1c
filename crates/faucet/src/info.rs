use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, U256};
use attractor_core::AppError;

use crate::client::FaucetApi;

/// Public configuration of a deployed faucet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaucetInfo {
    pub address: Address,
    pub token: Address,
    pub portion: U256,
    pub signer: Address,
    pub owner: Address,
}

impl FaucetInfo {
    /// Read `token`, `portion`, `signer` and `owner` concurrently.
    pub async fn fetch<F: FaucetApi + ?Sized>(faucet: &F) -> Result<Self, AppError> {
        let (token, portion, signer, owner) = tokio::try_join!(
            faucet.token(),
            faucet.portion(),
            faucet.signer(),
            faucet.owner(),
        )?;
        Ok(Self {
            address: faucet.address(),
            token,
            portion,
            signer,
            owner,
        })
    }

    /// Whether the faucet hands out the native coin rather than an ERC-20.
    pub fn dispenses_native(&self) -> bool {
        self.token == Address::ZERO
    }

    /// Human-readable report, one line per fact.
    ///
    /// The native portion is shown in ether. An ERC-20 portion is printed raw,
    /// since the token's decimals are not read here.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Faucet address is {}", self.address),
            format!("Faucet owner is {}", self.owner),
            format!("Faucet signer is {}", self.signer),
        ];
        if self.dispenses_native() {
            lines.push("Faucet dispensing ATTRA".to_string());
            lines.push(format!(
                "Faucet portion is {} (decimal-aware)",
                format_ether(self.portion)
            ));
        } else {
            lines.push(format!("Faucet dispensing ERC20 at {}", self.token));
            lines.push(format!("Faucet portion is {} (decimal-unaware)", self.portion));
        }
        lines
    }
}
