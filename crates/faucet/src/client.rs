use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use attractor_core::AppError;

use crate::abi::Faucet;
use crate::authorization::{Actor, AuthSignature};
use crate::provider::AttractorProvider;
use crate::revert::call_error;
use crate::tx::{Confirmation, confirm};

/// Typed view of the faucet contract.
///
/// State-changing methods return once the transaction has the configured
/// number of confirmations. Reverts come back as [`AppError::Revert`].
#[async_trait]
pub trait FaucetApi: Send + Sync {
    /// Address of the faucet contract.
    fn address(&self) -> Address;

    /// Dispensed token; the zero address means the native coin.
    async fn token(&self) -> Result<Address, AppError>;

    /// Amount released per successful dispense.
    async fn portion(&self) -> Result<U256, AppError>;

    async fn owner(&self) -> Result<Address, AppError>;

    /// Currently trusted authorization signer.
    async fn signer(&self) -> Result<Address, AppError>;

    async fn trust(&self, signer: Address) -> Result<TxHash, AppError>;

    async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash, AppError>;

    /// Send every dispensable token back to the owner.
    async fn flush(&self) -> Result<TxHash, AppError>;

    async fn dispense(
        &self,
        actor: &Actor,
        signature: &AuthSignature,
        deadline: u64,
    ) -> Result<TxHash, AppError>;
}

/// [`FaucetApi`] backed by a live RPC provider.
pub struct FaucetClient {
    contract: Faucet::FaucetInstance<AttractorProvider>,
    confirmation: Confirmation,
}

impl FaucetClient {
    pub fn new(address: Address, provider: AttractorProvider, confirmation: Confirmation) -> Self {
        Self {
            contract: Faucet::new(address, provider),
            confirmation,
        }
    }
}

#[async_trait]
impl FaucetApi for FaucetClient {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn token(&self) -> Result<Address, AppError> {
        self.contract
            .token()
            .call()
            .await
            .map_err(|e| call_error("token", e))
    }

    async fn portion(&self) -> Result<U256, AppError> {
        self.contract
            .portion()
            .call()
            .await
            .map_err(|e| call_error("portion", e))
    }

    async fn owner(&self) -> Result<Address, AppError> {
        self.contract
            .owner()
            .call()
            .await
            .map_err(|e| call_error("owner", e))
    }

    async fn signer(&self) -> Result<Address, AppError> {
        self.contract
            .signer()
            .call()
            .await
            .map_err(|e| call_error("signer", e))
    }

    async fn trust(&self, signer: Address) -> Result<TxHash, AppError> {
        let pending = self
            .contract
            .trust(signer)
            .send()
            .await
            .map_err(|e| call_error("trust", e))?;
        Ok(confirm("trust", pending, self.confirmation).await?.tx_hash)
    }

    async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash, AppError> {
        let pending = self
            .contract
            .transferOwnership(new_owner)
            .send()
            .await
            .map_err(|e| call_error("transferOwnership", e))?;
        Ok(confirm("transferOwnership", pending, self.confirmation)
            .await?
            .tx_hash)
    }

    async fn flush(&self) -> Result<TxHash, AppError> {
        let pending = self
            .contract
            .flush()
            .send()
            .await
            .map_err(|e| call_error("flush", e))?;
        Ok(confirm("flush", pending, self.confirmation).await?.tx_hash)
    }

    async fn dispense(
        &self,
        actor: &Actor,
        signature: &AuthSignature,
        deadline: u64,
    ) -> Result<TxHash, AppError> {
        let pending = self
            .contract
            .dispense((*actor).into(), (*signature).into(), deadline)
            .send()
            .await
            .map_err(|e| call_error("dispense", e))?;
        Ok(confirm("dispense", pending, self.confirmation).await?.tx_hash)
    }
}
