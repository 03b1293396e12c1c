use alloy::{
    network::EthereumWallet,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};

/// The Attractor RPC provider type used throughout the application.
///
/// Type-erased so the faucet client and commands do not carry the filler stack.
pub type AttractorProvider = DynProvider;

/// Create a wallet-backed HTTP provider from an RPC URL string.
///
/// Every transaction sent through the provider is signed by `account`.
pub fn create_provider(rpc_url: &str, account: PrivateKeySigner) -> eyre::Result<AttractorProvider> {
    let url = rpc_url.parse()?;
    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(account))
        .connect_http(url);
    Ok(provider.erased())
}
