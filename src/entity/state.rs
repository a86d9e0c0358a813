use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of the session in the approve-then-buy sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransitionState {
    #[default]
    NotStarted,
    Approving,
    Approved,
    Buying,
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransitionState::NotStarted => "not-started",
            TransitionState::Approving => "approving",
            TransitionState::Approved => "approved",
            TransitionState::Buying => "buying",
        };
        f.write_str(label)
    }
}

/// What the presentation shell should offer, derived from the state and the
/// confirmation status of the transaction it is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    ApproveOffered,
    Approving,
    BuyOffered,
    Buying,
    Completed,
}
