use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::DynProvider;
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::chain::{
    create_provider, ChainConfig, LocalWalletConnector, RpcReadService, RpcReceiptService,
    RpcTransactionService, WalletConnector,
};
use crate::entity::{Event, Session};
use crate::interactor::{
    PurchaseInteractor, PurchaseInteractorImpl, RefreshInteractor, RefreshInteractorImpl,
};
use crate::presenter::PresalePresenterImpl;
use crate::services::{ConfirmationService, WalletWatcher};
use crate::view::PresaleView;

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    config: ChainConfig,

    wallet_connector: Arc<dyn WalletConnector>,
    refresh_interactor: Arc<dyn RefreshInteractor>,
    purchase_interactor: Arc<dyn PurchaseInteractor>,
    confirmation_service: Arc<ConfirmationService>,
}

impl ServiceContainer {
    /// Create a container talking to the configured RPC endpoint with `signer`
    pub fn new(config: ChainConfig, signer: PrivateKeySigner) -> Result<Self> {
        let account = signer.address();
        let provider = create_provider(&config.rpc_url, signer)?;

        Ok(Self::with_provider(config, account, provider))
    }

    pub fn with_provider(config: ChainConfig, account: Address, provider: DynProvider) -> Self {
        let wallet_connector = Arc::new(LocalWalletConnector::new(account, provider.clone()))
            as Arc<dyn WalletConnector>;

        let refresh_interactor = Arc::new(RefreshInteractorImpl::new(
            Arc::new(RpcReadService::new(provider.clone())),
            config.sale_contract,
            config.usdt_address,
            config.usdc_address,
        )) as Arc<dyn RefreshInteractor>;

        let purchase_interactor = Arc::new(PurchaseInteractorImpl::new(
            Arc::new(RpcTransactionService::new(provider.clone())),
            config.sale_contract,
        )) as Arc<dyn PurchaseInteractor>;

        let confirmation_service = Arc::new(ConfirmationService::new(
            Arc::new(RpcReceiptService::new(provider)),
            config.poll_interval(),
            config.confirmation_timeout(),
        ));

        Self {
            config,
            wallet_connector,
            refresh_interactor,
            purchase_interactor,
            confirmation_service,
        }
    }

    pub fn wallet_watcher(&self) -> WalletWatcher {
        WalletWatcher::new(self.wallet_connector.clone(), self.config.poll_interval())
    }

    /// Build the session loop with a fresh session rendered through `view`
    pub fn presenter<V>(&self, view: Arc<V>, events: UnboundedSender<Event>) -> PresalePresenterImpl<V>
    where
        V: PresaleView + 'static,
    {
        PresalePresenterImpl::new(
            Session::new(self.config.currency_book()),
            view,
            self.refresh_interactor.clone(),
            self.purchase_interactor.clone(),
            self.confirmation_service.clone(),
            events,
        )
    }
}
