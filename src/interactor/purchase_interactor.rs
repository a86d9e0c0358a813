use crate::chain::TransactionService;
use crate::entity::{ApproveOrder, BuyOrder, PresaleError};
use alloy::primitives::{Address, TxHash};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait PurchaseInteractor: Send + Sync {
    async fn submit_approve(&self, order: &ApproveOrder) -> Result<TxHash, PresaleError>;

    async fn submit_buy(&self, order: &BuyOrder) -> Result<TxHash, PresaleError>;
}

pub struct PurchaseInteractorImpl {
    transaction_service: Arc<dyn TransactionService>,
    sale_contract: Address,
}

impl PurchaseInteractorImpl {
    pub fn new(transaction_service: Arc<dyn TransactionService>, sale_contract: Address) -> Self {
        Self {
            transaction_service,
            sale_contract,
        }
    }
}

#[async_trait]
impl PurchaseInteractor for PurchaseInteractorImpl {
    async fn submit_approve(&self, order: &ApproveOrder) -> Result<TxHash, PresaleError> {
        info!(
            "Approving {} {} for sale contract {}",
            order.amount, order.currency, self.sale_contract
        );

        self.transaction_service
            .approve(order.token, self.sale_contract, order.amount)
            .await
            .map_err(|e| PresaleError::Submission(format!("{:#}", e)))
    }

    async fn submit_buy(&self, order: &BuyOrder) -> Result<TxHash, PresaleError> {
        info!("Buying with {} {}", order.amount, order.currency);

        self.transaction_service
            .buy(self.sale_contract, order.token, order.amount)
            .await
            .map_err(|e| PresaleError::Submission(format!("{:#}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Currency;
    use alloy::primitives::U256;
    use anyhow::{anyhow, Result};
    use std::sync::Mutex;

    const SALE: Address = Address::new([0x5a; 20]);
    const USDC: Address = Address::new([0x22; 20]);

    #[derive(Default)]
    struct RecordingTransactionService {
        calls: Mutex<Vec<(&'static str, Address, Address, U256)>>,
        reject: bool,
    }

    #[async_trait]
    impl TransactionService for RecordingTransactionService {
        async fn approve(&self, token: Address, spender: Address, amount: U256) -> Result<TxHash> {
            self.calls.lock().unwrap().push(("approve", token, spender, amount));
            if self.reject {
                return Err(anyhow!("user rejected the request"));
            }
            Ok(TxHash::repeat_byte(1))
        }

        async fn buy(&self, sale: Address, token: Address, amount: U256) -> Result<TxHash> {
            self.calls.lock().unwrap().push(("buy", sale, token, amount));
            if self.reject {
                return Err(anyhow!("user rejected the request"));
            }
            Ok(TxHash::repeat_byte(2))
        }
    }

    #[tokio::test]
    async fn approve_targets_sale_contract_as_spender() {
        let service = Arc::new(RecordingTransactionService::default());
        let interactor = PurchaseInteractorImpl::new(service.clone(), SALE);
        let order = ApproveOrder {
            currency: Currency::Usdc,
            token: USDC,
            amount: U256::from(10u8),
        };

        let hash = interactor.submit_approve(&order).await.unwrap();

        assert_eq!(hash, TxHash::repeat_byte(1));
        assert_eq!(
            service.calls.lock().unwrap()[0],
            ("approve", USDC, SALE, U256::from(10u8))
        );
    }

    #[tokio::test]
    async fn buy_passes_token_and_amount_to_sale_contract() {
        let service = Arc::new(RecordingTransactionService::default());
        let interactor = PurchaseInteractorImpl::new(service.clone(), SALE);
        let order = BuyOrder {
            currency: Currency::Usdc,
            token: USDC,
            amount: U256::from(7u8),
        };

        interactor.submit_buy(&order).await.unwrap();

        assert_eq!(
            service.calls.lock().unwrap()[0],
            ("buy", SALE, USDC, U256::from(7u8))
        );
    }

    #[tokio::test]
    async fn rejection_becomes_submission_error() {
        let service = Arc::new(RecordingTransactionService {
            reject: true,
            ..Default::default()
        });
        let interactor = PurchaseInteractorImpl::new(service, SALE);
        let order = BuyOrder {
            currency: Currency::Usdc,
            token: USDC,
            amount: U256::from(7u8),
        };

        let err = interactor.submit_buy(&order).await.unwrap_err();

        assert!(matches!(err, PresaleError::Submission(ref msg) if msg.contains("rejected")));
    }
}
