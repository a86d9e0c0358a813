use alloy::primitives::{Address, U256};

use crate::entity::Currency;

/// Account and chain a batched read was issued for. A result is applied only
/// while both still match the connected wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshToken {
    pub account: Address,
    pub chain_id: u64,
}

/// Outcome of the balance and allowance reads for one token. `None` marks a
/// failed read; the stored value is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyReading {
    pub balance: Option<U256>,
    pub allowance: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshOutcome {
    usdt: CurrencyReading,
    usdc: CurrencyReading,
}

impl RefreshOutcome {
    pub fn reading(&self, currency: Currency) -> &CurrencyReading {
        match currency {
            Currency::Usdt => &self.usdt,
            Currency::Usdc => &self.usdc,
        }
    }

    pub fn reading_mut(&mut self, currency: Currency) -> &mut CurrencyReading {
        match currency {
            Currency::Usdt => &mut self.usdt,
            Currency::Usdc => &mut self.usdc,
        }
    }
}
