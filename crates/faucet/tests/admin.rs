//! Read-side admin views over the in-memory faucet.

mod common;

use alloy::primitives::{Address, U256};
use attractor_faucet::{FaucetApi, FaucetInfo};
use attractor_faucet::deploy::{FaucetState, faucet_state};
use common::{FAUCET, MockFaucet, OWNER};

#[tokio::test]
async fn info_reports_native_faucet_in_ether() {
    let signer = Address::repeat_byte(0x0a);
    let faucet = MockFaucet::new(signer);

    let info = FaucetInfo::fetch(&faucet).await.unwrap();
    assert_eq!(info.address, FAUCET);
    assert_eq!(info.signer, signer);
    assert_eq!(info.owner, OWNER);
    assert!(info.dispenses_native());

    let lines = info.lines();
    assert_eq!(lines[3], "Faucet dispensing ATTRA");
    assert_eq!(lines[4], "Faucet portion is 1.000000000000000000 (decimal-aware)");
}

#[tokio::test]
async fn info_reports_erc20_faucet_raw() {
    let token = Address::repeat_byte(0x33);
    let mut faucet = MockFaucet::new(Address::repeat_byte(0x0a));
    faucet.token = token;
    faucet.portion = U256::from(5_000u64);

    let info = FaucetInfo::fetch(&faucet).await.unwrap();
    assert!(!info.dispenses_native());

    let lines = info.lines();
    assert_eq!(lines[3], format!("Faucet dispensing ERC20 at {token}"));
    assert_eq!(lines[4], "Faucet portion is 5000 (decimal-unaware)");
}

#[tokio::test]
async fn info_follows_a_retrust() {
    let faucet = MockFaucet::new(Address::repeat_byte(0x0a));
    let next = Address::repeat_byte(0x0b);

    faucet.trust(next).await.unwrap();

    let info = FaucetInfo::fetch(&faucet).await.unwrap();
    assert_eq!(info.lines()[2], format!("Faucet signer is {next}"));
}

#[tokio::test]
async fn deployed_state_is_read_back() {
    let faucet = MockFaucet::new(Address::repeat_byte(0x0a));

    let state = faucet_state(&faucet).await.unwrap();
    assert_eq!(
        state,
        FaucetState {
            token: Address::ZERO,
            portion: faucet.portion,
            owner: OWNER,
        }
    );
}
