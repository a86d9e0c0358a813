use alloy::primitives::TxHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    Approval,
    Purchase,
}

/// Confirmation status reported by the receipt poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Success,
    Reverted,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRecord {
    pub hash: TxHash,
    pub submitted_at: DateTime<Utc>,
    pub status: TxStatus,
}

impl TxRecord {
    pub fn submitted(hash: TxHash) -> Self {
        Self {
            hash,
            submitted_at: Utc::now(),
            status: TxStatus::Pending,
        }
    }
}
