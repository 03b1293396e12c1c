//! In-memory faucet that verifies authorizations the way the deployed
//! contract does.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, B256, TxHash, U256, address, keccak256};
use async_trait::async_trait;
use attractor_core::AppError;
use attractor_faucet::abi::Faucet;
use attractor_faucet::revert::describe;
use attractor_faucet::{Actor, AuthSignature, FaucetApi, recover_signer};

pub const FAUCET: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
pub const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
pub const NOW: u64 = 1_700_000_000;
/// Furthest deadline the mock accepts, relative to its clock.
pub const MAX_WINDOW: u64 = 60 * 60;

pub fn one_ether() -> U256 {
    U256::from(1_000_000_000_000_000_000u128)
}

pub struct MockFaucet {
    pub token: Address,
    pub now: u64,
    pub portion: U256,
    pub trusted: Mutex<Address>,
    pub reserve: Mutex<U256>,
    pub balances: Mutex<HashMap<Address, U256>>,
    pub used_names: Mutex<HashSet<B256>>,
    pub submitted: Mutex<Vec<(Actor, AuthSignature, u64)>>,
    pub nonce: AtomicU64,
}

impl MockFaucet {
    pub fn new(trusted: Address) -> Self {
        Self {
            token: Address::ZERO,
            now: NOW,
            portion: one_ether(),
            trusted: Mutex::new(trusted),
            reserve: Mutex::new(one_ether() * U256::from(10)),
            balances: Mutex::new(HashMap::new()),
            used_names: Mutex::new(HashSet::new()),
            submitted: Mutex::new(Vec::new()),
            nonce: AtomicU64::new(0),
        }
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn next_tx_hash(&self) -> TxHash {
        keccak256(self.nonce.fetch_add(1, Ordering::SeqCst).to_be_bytes())
    }

    fn revert(reason: &str) -> AppError {
        AppError::Revert {
            method: "dispense",
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl FaucetApi for MockFaucet {
    fn address(&self) -> Address {
        FAUCET
    }

    async fn token(&self) -> Result<Address, AppError> {
        Ok(self.token)
    }

    async fn portion(&self) -> Result<U256, AppError> {
        Ok(self.portion)
    }

    async fn owner(&self) -> Result<Address, AppError> {
        Ok(OWNER)
    }

    async fn signer(&self) -> Result<Address, AppError> {
        Ok(*self.trusted.lock().unwrap())
    }

    async fn trust(&self, signer: Address) -> Result<TxHash, AppError> {
        *self.trusted.lock().unwrap() = signer;
        Ok(self.next_tx_hash())
    }

    async fn transfer_ownership(&self, _new_owner: Address) -> Result<TxHash, AppError> {
        Ok(self.next_tx_hash())
    }

    async fn flush(&self) -> Result<TxHash, AppError> {
        *self.reserve.lock().unwrap() = U256::ZERO;
        Ok(self.next_tx_hash())
    }

    async fn dispense(
        &self,
        actor: &Actor,
        signature: &AuthSignature,
        deadline: u64,
    ) -> Result<TxHash, AppError> {
        self.submitted
            .lock()
            .unwrap()
            .push((*actor, *signature, deadline));

        if deadline > self.now + MAX_WINDOW {
            let too_far = Faucet::FaucetErrors::DeadlineIsTooFar(Faucet::DeadlineIsTooFar {});
            return Err(Self::revert(&describe(&too_far)));
        }
        if deadline < self.now {
            return Err(Self::revert("deadline passed"));
        }
        let recovered = recover_signer(actor, FAUCET, deadline, signature)
            .map_err(|_| Self::revert("bad signature"))?;
        if recovered != *self.trusted.lock().unwrap() {
            return Err(Self::revert("untrusted signer"));
        }
        if !self.used_names.lock().unwrap().insert(actor.name) {
            return Err(Self::revert("already dispensed"));
        }

        let mut reserve = self.reserve.lock().unwrap();
        *reserve -= self.portion;
        *self.balances.lock().unwrap().entry(actor.addr).or_default() += self.portion;
        Ok(self.next_tx_hash())
    }
}
