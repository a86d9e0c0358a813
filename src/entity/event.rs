use alloy::primitives::{Address, TxHash};

use crate::entity::{
    BuyOrder, Currency, PresaleError, RefreshOutcome, RefreshToken, TxKind, TxStatus,
};

/// Something the user asked for through the presentation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIntent {
    SetAmount(String),
    SelectCurrency(Currency),
    Approve,
    Buy,
    Refresh,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Input to the session loop. Everything that mutates the session arrives
/// as one of these, so the loop stays the only writer.
#[derive(Debug)]
pub enum Event {
    Intent(UserIntent),
    WalletChanged {
        account: Option<Address>,
        chain_id: u64,
    },
    RefreshCompleted {
        token: RefreshToken,
        outcome: Option<RefreshOutcome>,
    },
    ApprovalSubmitted(Result<TxHash, PresaleError>),
    PurchaseSubmitted {
        order: BuyOrder,
        result: Result<TxHash, PresaleError>,
    },
    TxStatusChanged {
        kind: TxKind,
        hash: TxHash,
        status: TxStatus,
    },
}
