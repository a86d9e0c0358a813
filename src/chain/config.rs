use alloy::primitives::Address;
use serde::Deserialize;
use std::time::Duration;

use crate::chain::contracts::{SALE_CONTRACT_ADDRESS, TOKEN_DECIMALS, USDC_ADDRESS, USDT_ADDRESS};
use crate::entity::{CurrencyBook, CurrencyInfo, PresaleError};

/// Chain and contract configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint of the sale chain
    pub rpc_url: String,

    /// Sale contract receiving `buy` calls
    pub sale_contract: Address,

    pub usdt_address: Address,
    pub usdt_decimals: u8,

    pub usdc_address: Address,
    pub usdc_decimals: u8,

    /// Delay between receipt and wallet polls
    pub poll_interval_ms: u64,

    /// Give up waiting for a receipt after this long. Unset waits forever.
    #[serde(default)]
    pub confirmation_timeout_secs: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            sale_contract: SALE_CONTRACT_ADDRESS,
            usdt_address: USDT_ADDRESS,
            usdt_decimals: TOKEN_DECIMALS,
            usdc_address: USDC_ADDRESS,
            usdc_decimals: TOKEN_DECIMALS,
            poll_interval_ms: 2_000,
            confirmation_timeout_secs: None,
        }
    }
}

impl ChainConfig {
    /// Load configuration from defaults, an optional `presale.toml` and
    /// `PRESALE_*` environment variables, in that order of precedence.
    pub fn load() -> Result<Self, PresaleError> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("rpc_url", defaults.rpc_url)?
            .set_default("sale_contract", defaults.sale_contract.to_string())?
            .set_default("usdt_address", defaults.usdt_address.to_string())?
            .set_default("usdt_decimals", defaults.usdt_decimals as u64)?
            .set_default("usdc_address", defaults.usdc_address.to_string())?
            .set_default("usdc_decimals", defaults.usdc_decimals as u64)?
            .set_default("poll_interval_ms", defaults.poll_interval_ms)?
            .add_source(config::File::with_name("presale").required(false))
            .add_source(config::Environment::with_prefix("PRESALE").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Option<Duration> {
        self.confirmation_timeout_secs.map(Duration::from_secs)
    }

    /// Empty store for the supported tokens.
    pub fn currency_book(&self) -> CurrencyBook {
        CurrencyBook::new(
            CurrencyInfo::new(self.usdt_address, self.usdt_decimals),
            CurrencyInfo::new(self.usdc_address, self.usdc_decimals),
        )
    }
}
