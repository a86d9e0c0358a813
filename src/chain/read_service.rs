use alloy::eips::BlockId;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::future::join_all;
use log::debug;

use crate::chain::contracts::IERC20;

/// One token read of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadCall {
    BalanceOf {
        token: Address,
        owner: Address,
    },
    Allowance {
        token: Address,
        owner: Address,
        spender: Address,
    },
}

/// Batched contract reads with a separate outcome per call
#[async_trait]
pub trait ReadService: Send + Sync {
    /// Issue every call against `chain_id`. The outer error means the batch
    /// as a whole could not run; inner errors belong to single calls.
    async fn batch_read(&self, chain_id: u64, calls: &[ReadCall]) -> Result<Vec<Result<U256>>>;
}

pub struct RpcReadService {
    provider: DynProvider,
}

impl RpcReadService {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    async fn read(&self, call: ReadCall, block: BlockId) -> Result<U256> {
        match call {
            ReadCall::BalanceOf { token, owner } => {
                let erc20 = IERC20::new(token, self.provider.clone());
                erc20
                    .balanceOf(owner)
                    .block(block)
                    .call()
                    .await
                    .map_err(|e| anyhow!("balanceOf({}) on {} failed: {}", owner, token, e))
            }
            ReadCall::Allowance {
                token,
                owner,
                spender,
            } => {
                let erc20 = IERC20::new(token, self.provider.clone());
                erc20
                    .allowance(owner, spender)
                    .block(block)
                    .call()
                    .await
                    .map_err(|e| anyhow!("allowance({}, {}) on {} failed: {}", owner, spender, token, e))
            }
        }
    }
}

#[async_trait]
impl ReadService for RpcReadService {
    async fn batch_read(&self, chain_id: u64, calls: &[ReadCall]) -> Result<Vec<Result<U256>>> {
        let connected = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| anyhow!("Failed to read chain id: {}", e))?;

        if connected != chain_id {
            return Err(anyhow!(
                "RPC endpoint serves chain {} but chain {} was requested",
                connected,
                chain_id
            ));
        }

        // Every call of the batch reads the same block
        let block = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| anyhow!("Failed to read block number: {}", e))?;

        debug!("Reading {} calls on chain {} at block {}", calls.len(), chain_id, block);
        let block = BlockId::number(block);
        Ok(join_all(calls.iter().map(|call| self.read(*call, block))).await)
    }
}
