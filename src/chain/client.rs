use alloy::network::EthereumWallet;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use anyhow::{anyhow, Result};

/// Create a signing provider for the sale chain
pub fn create_provider(rpc_url: &str, signer: PrivateKeySigner) -> Result<DynProvider> {
    let url: Url = rpc_url
        .parse()
        .map_err(|e| anyhow!("Invalid RPC URL {}: {}", rpc_url, e))?;

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url);

    Ok(provider.erased())
}

/// Parse a hex-encoded private key into a local signer
pub fn signer_from_hex(private_key: &str) -> Result<PrivateKeySigner> {
    private_key
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| anyhow!("Invalid private key: {}", e))
}
