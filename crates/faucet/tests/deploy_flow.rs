//! Faucet deployment ordering against a scripted chain.

use std::sync::Mutex;

use alloy::primitives::{Address, TxHash, U256, address, keccak256};
use async_trait::async_trait;
use attractor_core::AppError;
use attractor_faucet::artifact::Artifact;
use attractor_faucet::deploy::{ContractDeployer, SubmittedDeployment, deploy_faucet};
use attractor_faucet::tx::Confirmed;

const DEPLOYER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
const NONCE: u64 = 7;

#[derive(Clone, Copy)]
enum Receipt {
    TimesOut,
    Creates(Address),
    Missing,
}

struct ScriptedChain {
    receipt: Receipt,
    events: Mutex<Vec<&'static str>>,
}

impl ScriptedChain {
    fn new(receipt: Receipt) -> Self {
        Self {
            receipt,
            events: Mutex::new(Vec::new()),
        }
    }

    fn log(&self, event: &'static str) {
        self.events.lock().unwrap().push(event);
    }

    fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

fn tx_hash() -> TxHash {
    keccak256(b"deploy")
}

#[async_trait]
impl ContractDeployer for ScriptedChain {
    fn deployer(&self) -> Address {
        DEPLOYER
    }

    async fn next_nonce(&self) -> Result<u64, AppError> {
        self.log("nonce");
        Ok(NONCE)
    }

    async fn submit(
        &self,
        _method: &'static str,
        code: Vec<u8>,
        nonce: u64,
    ) -> Result<TxHash, AppError> {
        assert_eq!(nonce, NONCE);
        assert!(!code.is_empty());
        self.log("submit");
        Ok(tx_hash())
    }

    async fn wait(&self, method: &'static str, tx_hash: TxHash) -> Result<Confirmed, AppError> {
        self.log("wait");
        let contract_address = match self.receipt {
            Receipt::TimesOut => {
                return Err(AppError::Rpc(format!(
                    "{method} {tx_hash:#x} not confirmed: timed out"
                )));
            }
            Receipt::Creates(address) => Some(address),
            Receipt::Missing => None,
        };
        Ok(Confirmed {
            tx_hash,
            from: DEPLOYER,
            contract_address,
        })
    }
}

fn artifact() -> Artifact {
    Artifact::from_json(r#"{"contractName": "Faucet", "bytecode": "0x6080604052"}"#).unwrap()
}

async fn run(chain: &ScriptedChain) -> (Result<Address, AppError>, Option<SubmittedDeployment>) {
    let seen = Mutex::new(None);
    let result = deploy_faucet(
        chain,
        &artifact(),
        Address::repeat_byte(0x01),
        Address::ZERO,
        U256::from(1u64),
        |submitted| {
            chain.log("record");
            *seen.lock().unwrap() = Some(*submitted);
            Ok(())
        },
    )
    .await
    .map(|deployment| deployment.address);
    (result, seen.into_inner().unwrap())
}

#[tokio::test]
async fn submission_is_recorded_before_waiting() {
    let chain = ScriptedChain::new(Receipt::Creates(DEPLOYER.create(NONCE)));

    let (result, seen) = run(&chain).await;

    assert_eq!(result.unwrap(), DEPLOYER.create(NONCE));
    assert_eq!(chain.events(), ["nonce", "submit", "record", "wait"]);
    let seen = seen.unwrap();
    assert_eq!(seen.address, DEPLOYER.create(NONCE));
    assert_eq!(seen.deployer, DEPLOYER);
    assert_eq!(seen.nonce, NONCE);
    assert_eq!(seen.tx_hash, tx_hash());
}

#[tokio::test]
async fn confirmation_timeout_still_leaves_a_record() {
    let chain = ScriptedChain::new(Receipt::TimesOut);

    let (result, seen) = run(&chain).await;

    assert!(matches!(result, Err(AppError::Rpc(_))));
    assert_eq!(chain.events(), ["nonce", "submit", "record", "wait"]);
    assert_eq!(seen.unwrap().address, DEPLOYER.create(NONCE));
}

#[tokio::test]
async fn failing_record_stops_before_waiting() {
    let chain = ScriptedChain::new(Receipt::Creates(DEPLOYER.create(NONCE)));

    let err = deploy_faucet(
        &chain,
        &artifact(),
        Address::repeat_byte(0x01),
        Address::ZERO,
        U256::from(1u64),
        |_| Err(AppError::Io(std::io::ErrorKind::AlreadyExists.into())),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError::Io(_)));
    assert_eq!(chain.events(), ["nonce", "submit"]);
}

#[tokio::test]
async fn unexpected_created_address_is_an_error() {
    let chain = ScriptedChain::new(Receipt::Creates(Address::repeat_byte(0x99)));
    let (result, _) = run(&chain).await;
    assert!(matches!(result, Err(AppError::Rpc(_))));
}

#[tokio::test]
async fn receipt_without_contract_address_is_an_error() {
    let chain = ScriptedChain::new(Receipt::Missing);
    let (result, seen) = run(&chain).await;
    assert!(matches!(result, Err(AppError::Rpc(_))));
    assert!(seen.is_some());
}
