use crate::chain::{ReadCall, ReadService};
use crate::entity::{Currency, RefreshOutcome, RefreshToken};
use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

#[async_trait]
pub trait RefreshInteractor: Send + Sync {
    /// Read balances and allowances of both tokens for the token's account.
    async fn fetch(&self, token: RefreshToken) -> Result<RefreshOutcome>;
}

pub struct RefreshInteractorImpl {
    read_service: Arc<dyn ReadService>,
    sale_contract: Address,
    tokens: [(Currency, Address); 2],
}

impl RefreshInteractorImpl {
    pub fn new(
        read_service: Arc<dyn ReadService>,
        sale_contract: Address,
        usdt: Address,
        usdc: Address,
    ) -> Self {
        Self {
            read_service,
            sale_contract,
            tokens: [(Currency::Usdt, usdt), (Currency::Usdc, usdc)],
        }
    }

    // Balances first, then allowances, in token order
    fn calls(&self, owner: Address) -> Vec<ReadCall> {
        let balances = self
            .tokens
            .iter()
            .map(|&(_, token)| ReadCall::BalanceOf { token, owner });
        let allowances = self.tokens.iter().map(|&(_, token)| ReadCall::Allowance {
            token,
            owner,
            spender: self.sale_contract,
        });

        balances.chain(allowances).collect()
    }
}

#[async_trait]
impl RefreshInteractor for RefreshInteractorImpl {
    async fn fetch(&self, token: RefreshToken) -> Result<RefreshOutcome> {
        let calls = self.calls(token.account);
        let results = self
            .read_service
            .batch_read(token.chain_id, &calls)
            .await?;

        if results.len() != calls.len() {
            return Err(anyhow!(
                "Batched read returned {} results for {} calls",
                results.len(),
                calls.len()
            ));
        }

        let mut outcome = RefreshOutcome::default();
        let (balances, allowances) = results.split_at(self.tokens.len());

        for (&(currency, _), result) in self.tokens.iter().zip(balances) {
            match result {
                Ok(balance) => outcome.reading_mut(currency).balance = Some(*balance),
                Err(e) => warn!("{} balance read failed: {}", currency, e),
            }
        }

        for (&(currency, _), result) in self.tokens.iter().zip(allowances) {
            match result {
                Ok(allowance) => outcome.reading_mut(currency).allowance = Some(*allowance),
                Err(e) => warn!("{} allowance read failed: {}", currency, e),
            }
        }

        debug!("Refresh for {} on chain {}: {:?}", token.account, token.chain_id, outcome);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use std::sync::Mutex;

    const SALE: Address = Address::new([0x5a; 20]);
    const USDT: Address = Address::new([0x11; 20]);
    const USDC: Address = Address::new([0x22; 20]);
    const ALICE: Address = Address::new([0xa1; 20]);

    struct FakeReadService {
        responses: Mutex<Vec<Result<U256>>>,
        seen: Mutex<Vec<(u64, Vec<ReadCall>)>>,
    }

    impl FakeReadService {
        fn new(responses: Vec<Result<U256>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReadService for FakeReadService {
        async fn batch_read(&self, chain_id: u64, calls: &[ReadCall]) -> Result<Vec<Result<U256>>> {
            self.seen.lock().unwrap().push((chain_id, calls.to_vec()));
            Ok(std::mem::take(&mut *self.responses.lock().unwrap()))
        }
    }

    fn interactor(service: Arc<FakeReadService>) -> RefreshInteractorImpl {
        RefreshInteractorImpl::new(service, SALE, USDT, USDC)
    }

    fn token() -> RefreshToken {
        RefreshToken {
            account: ALICE,
            chain_id: 42,
        }
    }

    #[tokio::test]
    async fn issues_four_reads_in_order() {
        let service = Arc::new(FakeReadService::new(vec![
            Ok(U256::from(1u8)),
            Ok(U256::from(2u8)),
            Ok(U256::from(3u8)),
            Ok(U256::from(4u8)),
        ]));

        let outcome = interactor(service.clone()).fetch(token()).await.unwrap();

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, 42);
        assert_eq!(
            seen[0].1,
            vec![
                ReadCall::BalanceOf { token: USDT, owner: ALICE },
                ReadCall::BalanceOf { token: USDC, owner: ALICE },
                ReadCall::Allowance { token: USDT, owner: ALICE, spender: SALE },
                ReadCall::Allowance { token: USDC, owner: ALICE, spender: SALE },
            ]
        );

        assert_eq!(outcome.reading(Currency::Usdt).balance, Some(U256::from(1u8)));
        assert_eq!(outcome.reading(Currency::Usdc).balance, Some(U256::from(2u8)));
        assert_eq!(outcome.reading(Currency::Usdt).allowance, Some(U256::from(3u8)));
        assert_eq!(outcome.reading(Currency::Usdc).allowance, Some(U256::from(4u8)));
    }

    #[tokio::test]
    async fn failed_calls_leave_gaps() {
        let service = Arc::new(FakeReadService::new(vec![
            Err(anyhow!("execution reverted")),
            Ok(U256::from(2u8)),
            Ok(U256::from(3u8)),
            Err(anyhow!("timeout")),
        ]));

        let outcome = interactor(service).fetch(token()).await.unwrap();

        assert_eq!(outcome.reading(Currency::Usdt).balance, None);
        assert_eq!(outcome.reading(Currency::Usdt).allowance, Some(U256::from(3u8)));
        assert_eq!(outcome.reading(Currency::Usdc).balance, Some(U256::from(2u8)));
        assert_eq!(outcome.reading(Currency::Usdc).allowance, None);
    }

    #[tokio::test]
    async fn short_batch_is_an_error() {
        let service = Arc::new(FakeReadService::new(vec![Ok(U256::from(1u8))]));

        assert!(interactor(service).fetch(token()).await.is_err());
    }
}
