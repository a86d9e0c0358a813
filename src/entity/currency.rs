use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::PresaleError;

/// Stablecoins accepted by the sale contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
    Usdt,
    #[default]
    Usdc,
}

impl Currency {
    pub const ALL: [Currency; 2] = [Currency::Usdt, Currency::Usdc];

    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usdt => "USDT",
            Currency::Usdc => "USDC",
        }
    }

    fn index(self) -> usize {
        match self {
            Currency::Usdt => 0,
            Currency::Usdc => 1,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Currency {
    type Err = PresaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USDT" => Ok(Currency::Usdt),
            "USDC" => Ok(Currency::Usdc),
            _ => Err(PresaleError::UnsupportedCurrency(s.trim().to_string())),
        }
    }
}

/// Balance and allowance snapshot for one token, all amounts in minimal units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub address: Address,
    pub decimals: u8,
    pub balance: U256,
    pub approved_amount: U256,
}

impl CurrencyInfo {
    pub fn new(address: Address, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            balance: U256::ZERO,
            approved_amount: U256::ZERO,
        }
    }
}

/// The fixed set of supported tokens, looked up by [`Currency`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBook {
    entries: [CurrencyInfo; 2],
}

impl CurrencyBook {
    pub fn new(usdt: CurrencyInfo, usdc: CurrencyInfo) -> Self {
        Self {
            entries: [usdt, usdc],
        }
    }

    pub fn get(&self, currency: Currency) -> &CurrencyInfo {
        &self.entries[currency.index()]
    }

    pub fn get_mut(&mut self, currency: Currency) -> &mut CurrencyInfo {
        &mut self.entries[currency.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Currency, &CurrencyInfo)> {
        Currency::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}
