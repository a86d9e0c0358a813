use crate::commands::register_commands;
use crate::entity::{Phase, SessionSnapshot, TxKind};
use crate::utils::shorten_address;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::Write;

#[async_trait]
pub trait PresaleView: Send + Sync {
    async fn display_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()>;
    async fn display_waiting_for_wallet(&self, kind: TxKind) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
    async fn display_help(&self) -> Result<()>;
}

pub struct ConsoleView;

impl ConsoleView {
    pub fn new() -> Self {
        Self
    }

    pub fn format_snapshot(snapshot: &SessionSnapshot) -> String {
        Self::format_snapshot_at(snapshot, Utc::now())
    }

    /// Render `snapshot` with wait times measured up to `now`.
    pub fn format_snapshot_at(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> String {
        let account = match snapshot.account {
            Some(account) => shorten_address(&account.to_string()),
            None => "not connected".to_string(),
        };

        let currencies = snapshot
            .balances
            .iter()
            .map(|view| {
                let marker = if view.currency == snapshot.currency { "*" } else { " " };
                let balance = if view.balance.is_empty() {
                    String::new()
                } else {
                    format!(" {}", view.balance)
                };
                format!("[{}{}{}]", marker, view.currency, balance)
            })
            .collect::<Vec<_>>()
            .join(" ");

        let amount = if snapshot.amount_valid {
            snapshot.amount_text.clone()
        } else {
            format!("{} (invalid)", snapshot.amount_text)
        };

        format!(
            "Wallet: {}\nAmount: {}\nCurrency: {}\nState: {}\n{}",
            account,
            amount,
            currencies,
            snapshot.state,
            Self::format_action(snapshot, now)
        )
    }

    fn format_action(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> String {
        let enabled = |on: bool| if on { "" } else { " (disabled)" };

        let action = match snapshot.phase {
            Phase::ApproveOffered => {
                return format!("> approve{}", enabled(snapshot.approve_enabled))
            }
            Phase::BuyOffered => return format!("> buy{}", enabled(snapshot.buy_enabled)),
            Phase::Completed => return "Purchase completed!".to_string(),
            Phase::Approving => match snapshot.approval_tx {
                Some(hash) => format!("Approving... {}", hash),
                None => "Approving...".to_string(),
            },
            Phase::Buying => match snapshot.purchase_tx {
                Some(hash) => format!("Buying... {}", hash),
                None => "Buying...".to_string(),
            },
        };

        match snapshot.waiting_since {
            Some(since) => format!("{} ({})", action, Self::format_elapsed(now - since)),
            None => action,
        }
    }

    fn format_elapsed(elapsed: chrono::Duration) -> String {
        let seconds = elapsed.num_seconds().max(0);
        if seconds < 60 {
            format!("{}s", seconds)
        } else {
            format!("{}m {:02}s", seconds / 60, seconds % 60)
        }
    }

    fn print(text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PresaleView for ConsoleView {
    async fn display_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()> {
        Self::print(&Self::format_snapshot(snapshot))
    }

    async fn display_waiting_for_wallet(&self, kind: TxKind) -> Result<()> {
        let action = match kind {
            TxKind::Approval => "approval",
            TxKind::Purchase => "purchase",
        };
        Self::print(&format!("Confirm the {} in your wallet...", action))
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        Self::print(&format!("❌ {}", error_message))
    }

    async fn display_help(&self) -> Result<()> {
        let mut text = String::from("Available commands:\n");
        for (command, description) in register_commands() {
            text.push_str(&format!("  {:<22} {}\n", command, description));
        }
        Self::print(text.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Currency, CurrencyView, TransitionState};
    use alloy::primitives::{Address, TxHash};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            account: Some(Address::new([0xa1; 20])),
            currency: Currency::Usdc,
            amount_text: "1000.0".to_string(),
            amount_valid: true,
            balances: vec![
                CurrencyView {
                    currency: Currency::Usdt,
                    balance: String::new(),
                },
                CurrencyView {
                    currency: Currency::Usdc,
                    balance: "2500.50".to_string(),
                },
            ],
            state: TransitionState::NotStarted,
            phase: Phase::ApproveOffered,
            approve_enabled: true,
            buy_enabled: false,
            approval_tx: None,
            purchase_tx: None,
            waiting_since: None,
        }
    }

    #[test]
    fn marks_selected_currency_with_balance() {
        let text = ConsoleView::format_snapshot(&snapshot());

        assert!(text.contains("[ USDT] [*USDC 2500.50]"));
        assert!(text.contains("State: not-started"));
        assert!(text.contains("> approve"));
        assert!(!text.contains("(disabled)"));
    }

    #[test]
    fn flags_invalid_amount_and_disabled_action() {
        let mut s = snapshot();
        s.amount_text = "abc".to_string();
        s.amount_valid = false;
        s.approve_enabled = false;

        let text = ConsoleView::format_snapshot(&s);

        assert!(text.contains("Amount: abc (invalid)"));
        assert!(text.contains("> approve (disabled)"));
    }

    #[test]
    fn shows_completion() {
        let mut s = snapshot();
        s.state = TransitionState::Buying;
        s.phase = Phase::Completed;
        s.purchase_tx = Some(TxHash::repeat_byte(2));

        assert!(ConsoleView::format_snapshot(&s).ends_with("Purchase completed!"));
    }

    #[test]
    fn shows_elapsed_wait_while_approving() {
        let since = Utc::now();
        let mut s = snapshot();
        s.state = TransitionState::Approving;
        s.phase = Phase::Approving;
        s.approval_tx = Some(TxHash::repeat_byte(1));
        s.waiting_since = Some(since);

        let text = ConsoleView::format_snapshot_at(&s, since + chrono::Duration::seconds(42));
        assert!(text.ends_with(&format!("Approving... {} (42s)", TxHash::repeat_byte(1))));

        let text = ConsoleView::format_snapshot_at(&s, since + chrono::Duration::seconds(125));
        assert!(text.ends_with("(2m 05s)"));
    }

    #[test]
    fn confirmed_approval_shows_no_wait() {
        let mut s = snapshot();
        s.state = TransitionState::Approving;
        s.phase = Phase::BuyOffered;
        s.buy_enabled = true;

        assert!(ConsoleView::format_snapshot(&s).ends_with("> buy"));
    }
}
