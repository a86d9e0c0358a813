use crate::entity::{
    Event, PresaleError, RefreshToken, Session, TxKind, TxStatus, UserIntent,
};
use crate::interactor::{PurchaseInteractor, RefreshInteractor};
use crate::services::ConfirmationService;
use crate::view::PresaleView;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

#[async_trait]
pub trait PresalePresenter: Send {
    /// Apply one event to the session. `Break` ends the session loop.
    async fn handle_event(&mut self, event: Event) -> Result<ControlFlow<()>>;

    /// Drive the session until the user quits or every sender is gone.
    async fn run(&mut self, mut events: UnboundedReceiver<Event>) -> Result<()> {
        while let Some(event) = events.recv().await {
            if self.handle_event(event).await?.is_break() {
                break;
            }
        }
        Ok(())
    }
}

/// Owns the session and is its only writer. Chain work is spawned and its
/// results come back through the event channel.
pub struct PresalePresenterImpl<V> {
    session: Session,
    view: Arc<V>,
    refresh_interactor: Arc<dyn RefreshInteractor>,
    purchase_interactor: Arc<dyn PurchaseInteractor>,
    confirmation_service: Arc<ConfirmationService>,
    events: UnboundedSender<Event>,
}

impl<V> PresalePresenterImpl<V>
where
    V: PresaleView + 'static,
{
    pub fn new(
        session: Session,
        view: Arc<V>,
        refresh_interactor: Arc<dyn RefreshInteractor>,
        purchase_interactor: Arc<dyn PurchaseInteractor>,
        confirmation_service: Arc<ConfirmationService>,
        events: UnboundedSender<Event>,
    ) -> Self {
        Self {
            session,
            view,
            refresh_interactor,
            purchase_interactor,
            confirmation_service,
            events,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn render(&self) -> Result<()> {
        self.view.display_snapshot(&self.session.snapshot()).await
    }

    fn spawn_refresh(&self, token: RefreshToken) {
        let interactor = self.refresh_interactor.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = match interactor.fetch(token).await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    error!("Balance refresh for {} failed: {:#}", token.account, e);
                    None
                }
            };
            let _ = events.send(Event::RefreshCompleted { token, outcome });
        });
    }

    async fn handle_intent(&mut self, intent: UserIntent) -> Result<ControlFlow<()>> {
        match intent {
            UserIntent::SetAmount(text) => {
                self.session.set_amount_text(&text);
                self.render().await?;
            }
            UserIntent::SelectCurrency(currency) => {
                self.session.select_currency(currency);
                self.render().await?;
            }
            UserIntent::Approve => self.approve().await?,
            UserIntent::Buy => self.buy().await?,
            UserIntent::Refresh => match self.session.refresh_token() {
                Some(token) => self.spawn_refresh(token),
                None => {
                    self.view
                        .display_error(PresaleError::WalletNotConnected.to_string())
                        .await?
                }
            },
            UserIntent::Status => self.render().await?,
            UserIntent::Help => self.view.display_help().await?,
            UserIntent::Quit => {
                info!("Leaving presale session");
                return Ok(ControlFlow::Break(()));
            }
            UserIntent::Unknown(line) => {
                self.view
                    .display_error(format!("Unknown command: {}", line))
                    .await?;
                self.view.display_help().await?;
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    async fn approve(&mut self) -> Result<()> {
        let order = match self.session.begin_approve() {
            Ok(order) => order,
            Err(e) => return self.view.display_error(e.to_string()).await,
        };

        self.view.display_waiting_for_wallet(TxKind::Approval).await?;

        let interactor = self.purchase_interactor.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = interactor.submit_approve(&order).await;
            let _ = events.send(Event::ApprovalSubmitted(result));
        });

        Ok(())
    }

    async fn buy(&mut self) -> Result<()> {
        let order = match self.session.begin_buy() {
            Ok(order) => order,
            Err(e) => return self.view.display_error(e.to_string()).await,
        };

        self.view.display_waiting_for_wallet(TxKind::Purchase).await?;

        let interactor = self.purchase_interactor.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = interactor.submit_buy(&order).await;
            let _ = events.send(Event::PurchaseSubmitted { order, result });
        });

        Ok(())
    }
}

#[async_trait]
impl<V> PresalePresenter for PresalePresenterImpl<V>
where
    V: PresaleView + 'static,
{
    async fn handle_event(&mut self, event: Event) -> Result<ControlFlow<()>> {
        match event {
            Event::Intent(intent) => return self.handle_intent(intent).await,
            Event::WalletChanged { account, chain_id } => {
                if let Some(token) = self.session.wallet_changed(account, chain_id) {
                    self.spawn_refresh(token);
                }
                self.render().await?;
            }
            Event::RefreshCompleted { token, outcome } => {
                if let Some(outcome) = outcome {
                    if self.session.apply_refresh(token, &outcome) {
                        self.render().await?;
                    }
                }
            }
            Event::ApprovalSubmitted(Ok(hash)) => {
                self.session.approval_submitted(hash);
                self.confirmation_service
                    .watch(TxKind::Approval, hash, self.events.clone());
                self.render().await?;
            }
            Event::ApprovalSubmitted(Err(e)) => {
                error!("Approval failed: {}", e);
                self.session.approval_failed(&e);
                self.view.display_error(e.to_string()).await?;
                self.render().await?;
            }
            Event::PurchaseSubmitted {
                order,
                result: Ok(hash),
            } => {
                self.session.purchase_submitted(&order, hash);
                self.confirmation_service
                    .watch(TxKind::Purchase, hash, self.events.clone());
                self.render().await?;
            }
            Event::PurchaseSubmitted { result: Err(e), .. } => {
                error!("Purchase failed: {}", e);
                self.session.purchase_failed(&e);
                self.view.display_error(e.to_string()).await?;
                self.render().await?;
            }
            Event::TxStatusChanged { kind, hash, status } => {
                let refresh = match kind {
                    TxKind::Approval => self.session.approval_status(hash, status),
                    TxKind::Purchase => self.session.purchase_status(hash, status),
                };
                if let Some(token) = refresh {
                    self.spawn_refresh(token);
                }
                if matches!(status, TxStatus::Reverted | TxStatus::TimedOut) {
                    self.view
                        .display_error(format!("Transaction {} did not confirm: {:?}", hash, status))
                        .await?;
                }
                self.render().await?;
            }
        }

        Ok(ControlFlow::Continue(()))
    }
}
