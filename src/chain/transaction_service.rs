use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};

use crate::chain::contracts::{IERC20, ISale};

/// Prepares and submits the two presale transactions
#[async_trait]
pub trait TransactionService: Send + Sync {
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash>;

    async fn buy(&self, sale: Address, token: Address, amount: U256) -> Result<TxHash>;
}

pub struct RpcTransactionService {
    provider: DynProvider,
}

impl RpcTransactionService {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl TransactionService for RpcTransactionService {
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
        let erc20 = IERC20::new(token, self.provider.clone());
        let call = erc20.approve(spender, amount);

        // Simulate first so a reverting call never reaches the wallet. Return
        // data is ignored: tokens differ on whether `approve` returns a bool.
        debug!("Preparing approve({}, {}) on {}", spender, amount, token);
        call.call_raw()
            .await
            .map_err(|e| anyhow!("approve would revert: {}", e))?;

        let pending = call
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send approve: {}", e))?;

        let hash = *pending.tx_hash();
        info!("approve sent: {}", hash);
        Ok(hash)
    }

    async fn buy(&self, sale: Address, token: Address, amount: U256) -> Result<TxHash> {
        let sale_contract = ISale::new(sale, self.provider.clone());
        let call = sale_contract.buy(token, amount);

        debug!("Preparing buy({}, {}) on {}", token, amount, sale);
        call.call_raw()
            .await
            .map_err(|e| anyhow!("buy would revert: {}", e))?;

        let pending = call
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send buy: {}", e))?;

        let hash = *pending.tx_hash();
        info!("buy sent: {}", hash);
        Ok(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Bytes;
    use alloy::providers::{Provider, ProviderBuilder};
    use alloy::transports::mock::Asserter;

    const TOKEN: Address = Address::new([0x11; 20]);
    const SALE: Address = Address::new([0x5a; 20]);

    fn service(asserter: &Asserter) -> RpcTransactionService {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        RpcTransactionService::new(provider.erased())
    }

    #[tokio::test]
    async fn approve_accepts_token_without_return_data() {
        let asserter = Asserter::new();
        let hash = TxHash::repeat_byte(0xaa);
        asserter.push_success(&Bytes::new());
        asserter.push_success(&hash);

        let sent = service(&asserter).approve(TOKEN, SALE, U256::from(1000)).await;

        assert_eq!(sent.unwrap(), hash);
    }

    #[tokio::test]
    async fn approve_accepts_token_returning_bool() {
        let asserter = Asserter::new();
        let hash = TxHash::repeat_byte(0xab);
        asserter.push_success(&Bytes::from(U256::from(1).to_be_bytes::<32>().to_vec()));
        asserter.push_success(&hash);

        let sent = service(&asserter).approve(TOKEN, SALE, U256::from(1000)).await;

        assert_eq!(sent.unwrap(), hash);
    }

    #[tokio::test]
    async fn approve_that_reverts_is_never_sent() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted");

        let err = service(&asserter)
            .approve(TOKEN, SALE, U256::from(1000))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("approve would revert"));
    }

    #[tokio::test]
    async fn buy_returns_hash_after_simulation() {
        let asserter = Asserter::new();
        let hash = TxHash::repeat_byte(0xbb);
        asserter.push_success(&Bytes::new());
        asserter.push_success(&hash);

        let sent = service(&asserter).buy(SALE, TOKEN, U256::from(1000)).await;

        assert_eq!(sent.unwrap(), hash);
    }

    #[tokio::test]
    async fn buy_that_reverts_reports_the_reason() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("execution reverted: sale closed");

        let err = service(&asserter)
            .buy(SALE, TOKEN, U256::from(1000))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("buy would revert"));
    }

    #[tokio::test]
    async fn send_failure_after_simulation_is_reported() {
        let asserter = Asserter::new();
        asserter.push_success(&Bytes::new());
        asserter.push_failure_msg("user rejected");

        let err = service(&asserter)
            .buy(SALE, TOKEN, U256::from(1000))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to send buy"));
    }
}
