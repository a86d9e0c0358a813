use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

/// Account and chain the user is currently connected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub account: Option<Address>,
    pub chain_id: u64,
}

/// Source of the connected account and active chain
#[async_trait]
pub trait WalletConnector: Send + Sync {
    async fn connection(&self) -> Result<Connection>;
}

/// Wallet backed by a local signer; the chain is whatever the RPC endpoint serves.
pub struct LocalWalletConnector {
    account: Address,
    provider: DynProvider,
}

impl LocalWalletConnector {
    pub fn new(account: Address, provider: DynProvider) -> Self {
        Self { account, provider }
    }
}

#[async_trait]
impl WalletConnector for LocalWalletConnector {
    async fn connection(&self) -> Result<Connection> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| anyhow!("Failed to read chain id: {}", e))?;

        Ok(Connection {
            account: Some(self.account),
            chain_id,
        })
    }
}
