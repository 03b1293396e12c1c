pub mod abi;
pub mod artifact;
pub mod authorization;
pub mod client;
pub mod deploy;
pub mod dispense;
pub mod funding;
pub mod identity;
pub mod info;
pub mod provider;
pub mod revert;
pub mod tx;

pub use abi::{AttractorToken, ERC20, Faucet};
pub use authorization::{Actor, AuthSignature, authorization_digest, authorize, recover_signer};
pub use client::{FaucetApi, FaucetClient};
pub use dispense::{DISPENSE_WINDOW, DispenseReceipt, dispense};
pub use identity::hash_identity;
pub use info::FaucetInfo;
pub use provider::create_provider;
pub use tx::Confirmation;
