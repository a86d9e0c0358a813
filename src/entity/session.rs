use alloy::primitives::{Address, TxHash, U256};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::entity::{
    Currency, CurrencyBook, Phase, PresaleError, RefreshOutcome, RefreshToken, TransitionState,
    TxKind, TxRecord, TxStatus,
};
use crate::utils::{format_amount, parse_amount};

/// Amount offered in the input field when the page loads.
pub const DEFAULT_AMOUNT: &str = "1000.0";

/// Parameters of an `approve(sale, amount)` call on the selected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApproveOrder {
    pub currency: Currency,
    pub token: Address,
    pub amount: U256,
}

/// Parameters of a `buy(token, amount)` call on the sale contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyOrder {
    pub currency: Currency,
    pub token: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Wallet {
    account: Address,
    chain_id: u64,
}

/// In-memory state of one presale page session.
///
/// Every mutation goes through a named transition. Methods that need chain
/// work return what to issue next (an order to submit or a refresh token) and
/// leave the actual I/O to the caller.
#[derive(Debug, Clone)]
pub struct Session {
    currencies: CurrencyBook,
    currency: Currency,
    amount_text: String,
    parsed_amount: U256,
    amount_valid: bool,
    state: TransitionState,
    approval_tx: Option<TxRecord>,
    purchase_tx: Option<TxRecord>,
    wallet: Option<Wallet>,
    in_flight: Option<TxKind>,
}

impl Session {
    pub fn new(currencies: CurrencyBook) -> Self {
        let mut session = Self {
            currencies,
            currency: Currency::default(),
            amount_text: DEFAULT_AMOUNT.to_string(),
            parsed_amount: U256::ZERO,
            amount_valid: false,
            state: TransitionState::NotStarted,
            approval_tx: None,
            purchase_tx: None,
            wallet: None,
            in_flight: None,
        };
        session.reparse_amount();
        session
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn currencies(&self) -> &CurrencyBook {
        &self.currencies
    }

    pub fn parsed_amount(&self) -> U256 {
        self.parsed_amount
    }

    pub fn is_amount_valid(&self) -> bool {
        self.amount_valid
    }

    pub fn approval_tx(&self) -> Option<&TxRecord> {
        self.approval_tx.as_ref()
    }

    pub fn purchase_tx(&self) -> Option<&TxRecord> {
        self.purchase_tx.as_ref()
    }

    pub fn account(&self) -> Option<Address> {
        self.wallet.map(|w| w.account)
    }

    pub fn set_amount_text(&mut self, text: &str) {
        self.amount_text = text.to_string();
        self.reparse_amount();
        self.reevaluate();
    }

    pub fn select_currency(&mut self, currency: Currency) {
        self.currency = currency;
        self.reparse_amount();
        self.reevaluate();
    }

    /// Record the account and chain reported by the wallet connector. Returns
    /// a token for a fresh batched read when something changed and an account
    /// is connected.
    pub fn wallet_changed(&mut self, account: Option<Address>, chain_id: u64) -> Option<RefreshToken> {
        let wallet = account.map(|account| Wallet { account, chain_id });
        if wallet == self.wallet {
            return None;
        }

        info!("Wallet changed: account={:?} chain_id={}", account, chain_id);
        self.wallet = wallet;
        self.refresh_token()
    }

    /// Token for a batched read against the currently connected wallet.
    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.wallet.map(|w| RefreshToken {
            account: w.account,
            chain_id: w.chain_id,
        })
    }

    /// Apply a batched read. Results issued for another account or chain are
    /// dropped whole. Returns whether the store was updated.
    pub fn apply_refresh(&mut self, token: RefreshToken, outcome: &RefreshOutcome) -> bool {
        if self.refresh_token() != Some(token) {
            debug!(
                "Discarding stale refresh for account={} chain_id={}",
                token.account, token.chain_id
            );
            return false;
        }

        for currency in Currency::ALL {
            let reading = outcome.reading(currency);
            let info = self.currencies.get_mut(currency);
            if let Some(balance) = reading.balance {
                info.balance = balance;
            }
            if let Some(allowance) = reading.allowance {
                info.approved_amount = allowance;
            }
        }

        self.reevaluate();
        true
    }

    pub fn can_approve(&self) -> bool {
        self.amount_valid
            && self.wallet.is_some()
            && self.in_flight.is_none()
            && self.state == TransitionState::NotStarted
    }

    pub fn can_buy(&self) -> bool {
        self.amount_valid
            && self.wallet.is_some()
            && self.in_flight.is_none()
            && (self.state == TransitionState::Approved
                || (self.state == TransitionState::Approving && self.approval_confirmed()))
    }

    pub fn begin_approve(&mut self) -> Result<ApproveOrder, PresaleError> {
        self.ensure_connected()?;
        if !self.can_approve() {
            return Err(PresaleError::ActionUnavailable("approve is not offered"));
        }

        self.in_flight = Some(TxKind::Approval);
        Ok(ApproveOrder {
            currency: self.currency,
            token: self.currencies.get(self.currency).address,
            amount: self.parsed_amount,
        })
    }

    pub fn approval_submitted(&mut self, hash: TxHash) {
        info!("Approval submitted: {}", hash);
        self.in_flight = None;
        self.approval_tx = Some(TxRecord::submitted(hash));
        self.state = TransitionState::Approving;
    }

    pub fn approval_failed(&mut self, error: &PresaleError) {
        warn!("Approval was not submitted: {}", error);
        self.in_flight = None;
        self.state = TransitionState::NotStarted;
        self.reevaluate();
    }

    /// Record a confirmation status for the approval transaction. A final
    /// status asks for a refresh so the store sees the new allowance.
    pub fn approval_status(&mut self, hash: TxHash, status: TxStatus) -> Option<RefreshToken> {
        if !Self::update_record(&mut self.approval_tx, hash, status) {
            return None;
        }
        if self.state != TransitionState::Approving {
            return None;
        }

        match status {
            TxStatus::Pending => None,
            TxStatus::Success => {
                info!("Approval {} confirmed", hash);
                self.refresh_token()
            }
            TxStatus::Reverted | TxStatus::TimedOut => {
                warn!("Approval {} did not confirm: {:?}", hash, status);
                self.state = TransitionState::NotStarted;
                self.reevaluate();
                self.refresh_token()
            }
        }
    }

    pub fn begin_buy(&mut self) -> Result<BuyOrder, PresaleError> {
        self.ensure_connected()?;
        if !self.can_buy() {
            return Err(PresaleError::ActionUnavailable("buy is not offered"));
        }

        self.in_flight = Some(TxKind::Purchase);
        Ok(BuyOrder {
            currency: self.currency,
            token: self.currencies.get(self.currency).address,
            amount: self.parsed_amount,
        })
    }

    /// Move to `Buying` and take the purchased amount off the stored balance
    /// and allowance until the next refresh overwrites them.
    pub fn purchase_submitted(&mut self, order: &BuyOrder, hash: TxHash) {
        info!("Purchase submitted: {}", hash);
        self.in_flight = None;
        self.purchase_tx = Some(TxRecord::submitted(hash));
        self.state = TransitionState::Buying;

        let info = self.currencies.get_mut(order.currency);
        info.balance = info.balance.saturating_sub(order.amount);
        info.approved_amount = info.approved_amount.saturating_sub(order.amount);
    }

    pub fn purchase_failed(&mut self, error: &PresaleError) {
        warn!("Purchase was not submitted: {}", error);
        self.in_flight = None;
        self.state = TransitionState::Approved;
    }

    pub fn purchase_status(&mut self, hash: TxHash, status: TxStatus) -> Option<RefreshToken> {
        if !Self::update_record(&mut self.purchase_tx, hash, status) {
            return None;
        }
        if self.state != TransitionState::Buying {
            return None;
        }

        match status {
            TxStatus::Pending => None,
            TxStatus::Success => {
                info!("Purchase {} confirmed", hash);
                self.refresh_token()
            }
            TxStatus::Reverted | TxStatus::TimedOut => {
                warn!("Purchase {} did not confirm: {:?}", hash, status);
                self.state = TransitionState::Approved;
                self.refresh_token()
            }
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            TransitionState::NotStarted => Phase::ApproveOffered,
            TransitionState::Approving if self.approval_confirmed() => Phase::BuyOffered,
            TransitionState::Approving => Phase::Approving,
            TransitionState::Approved => Phase::BuyOffered,
            TransitionState::Buying => match self.purchase_tx.as_ref().map(|tx| tx.status) {
                Some(TxStatus::Success) => Phase::Completed,
                _ => Phase::Buying,
            },
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            account: self.account(),
            currency: self.currency,
            amount_text: self.amount_text.clone(),
            amount_valid: self.amount_valid,
            balances: self
                .currencies
                .iter()
                .map(|(currency, info)| CurrencyView {
                    currency,
                    balance: format_amount(info.balance, info.decimals),
                })
                .collect(),
            state: self.state,
            phase: self.phase(),
            approve_enabled: self.can_approve(),
            buy_enabled: self.can_buy(),
            approval_tx: self.approval_tx.as_ref().map(|tx| tx.hash),
            purchase_tx: self.purchase_tx.as_ref().map(|tx| tx.hash),
            waiting_since: self.waiting_since(),
        }
    }

    /// Submission time of the transaction the current state is waiting on.
    fn waiting_since(&self) -> Option<DateTime<Utc>> {
        let record = match self.state {
            TransitionState::Approving => self.approval_tx.as_ref(),
            TransitionState::Buying => self.purchase_tx.as_ref(),
            _ => None,
        };
        record
            .filter(|tx| tx.status == TxStatus::Pending)
            .map(|tx| tx.submitted_at)
    }

    fn approval_confirmed(&self) -> bool {
        matches!(
            self.approval_tx.as_ref().map(|tx| tx.status),
            Some(TxStatus::Success)
        )
    }

    fn ensure_connected(&self) -> Result<(), PresaleError> {
        match self.wallet {
            Some(_) => Ok(()),
            None => Err(PresaleError::WalletNotConnected),
        }
    }

    fn update_record(record: &mut Option<TxRecord>, hash: TxHash, status: TxStatus) -> bool {
        match record {
            Some(tx) if tx.hash == hash => {
                tx.status = status;
                true
            }
            _ => false,
        }
    }

    // A failed parse keeps the previous amount; the validity flag gates use.
    fn reparse_amount(&mut self) {
        let decimals = self.currencies.get(self.currency).decimals;
        match parse_amount(&self.amount_text, decimals) {
            Ok(amount) => {
                self.parsed_amount = amount;
                self.amount_valid = true;
            }
            Err(e) => {
                debug!("Amount {:?} rejected: {}", self.amount_text, e);
                self.amount_valid = false;
            }
        }
    }

    fn reevaluate(&mut self) {
        if !self.amount_valid {
            return;
        }

        let allowance = self.currencies.get(self.currency).approved_amount;
        match self.state {
            TransitionState::NotStarted if allowance >= self.parsed_amount => {
                debug!("Allowance {} covers {}, skipping approval", allowance, self.parsed_amount);
                self.state = TransitionState::Approved;
            }
            TransitionState::Approved if allowance < self.parsed_amount => {
                debug!("Allowance {} below {}, approval required", allowance, self.parsed_amount);
                self.state = TransitionState::NotStarted;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyView {
    pub currency: Currency,
    pub balance: String,
}

/// Read-only view of the session handed to the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub account: Option<Address>,
    pub currency: Currency,
    pub amount_text: String,
    pub amount_valid: bool,
    pub balances: Vec<CurrencyView>,
    pub state: TransitionState,
    pub phase: Phase,
    pub approve_enabled: bool,
    pub buy_enabled: bool,
    pub approval_tx: Option<TxHash>,
    pub purchase_tx: Option<TxHash>,
    /// Set while a submitted transaction is still unconfirmed.
    pub waiting_since: Option<DateTime<Utc>>,
}
