use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider};
use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::entity::TxStatus;

/// Looks up whether a submitted transaction has been mined
#[async_trait]
pub trait ReceiptService: Send + Sync {
    async fn status(&self, hash: TxHash) -> Result<TxStatus>;
}

pub struct RpcReceiptService {
    provider: DynProvider,
}

impl RpcReceiptService {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ReceiptService for RpcReceiptService {
    async fn status(&self, hash: TxHash) -> Result<TxStatus> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| anyhow!("Failed to fetch receipt for {}: {}", hash, e))?;

        Ok(match receipt {
            None => TxStatus::Pending,
            Some(receipt) if receipt.status() => TxStatus::Success,
            Some(_) => TxStatus::Reverted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, Bloom, B256};
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;
    use serde_json::{json, Value};

    fn service(asserter: &Asserter) -> RpcReceiptService {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        RpcReceiptService::new(provider.erased())
    }

    fn receipt(hash: TxHash, status: &str) -> Value {
        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": Bloom::ZERO,
            "transactionHash": hash,
            "transactionIndex": "0x0",
            "blockHash": B256::repeat_byte(0x0b),
            "blockNumber": "0x1",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x1",
            "from": Address::new([0xa1; 20]),
            "to": Address::new([0x11; 20]),
            "contractAddress": null
        })
    }

    #[tokio::test]
    async fn missing_receipt_is_pending() {
        let asserter = Asserter::new();
        asserter.push_success(&Value::Null);

        let status = service(&asserter).status(TxHash::repeat_byte(1)).await.unwrap();

        assert_eq!(status, TxStatus::Pending);
    }

    #[tokio::test]
    async fn successful_receipt_maps_to_success() {
        let asserter = Asserter::new();
        let hash = TxHash::repeat_byte(2);
        asserter.push_success(&receipt(hash, "0x1"));

        let status = service(&asserter).status(hash).await.unwrap();

        assert_eq!(status, TxStatus::Success);
    }

    #[tokio::test]
    async fn failed_receipt_maps_to_reverted() {
        let asserter = Asserter::new();
        let hash = TxHash::repeat_byte(3);
        asserter.push_success(&receipt(hash, "0x0"));

        let status = service(&asserter).status(hash).await.unwrap();

        assert_eq!(status, TxStatus::Reverted);
    }

    #[tokio::test]
    async fn rpc_error_is_propagated() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("rate limited");

        let err = service(&asserter).status(TxHash::repeat_byte(4)).await.unwrap_err();

        assert!(err.to_string().contains("Failed to fetch receipt"));
    }
}
