#[derive(Debug, thiserror::Error)]
pub enum PresaleError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Action unavailable: {0}")]
    ActionUnavailable(&'static str),

    #[error("Transaction submission failed: {0}")]
    Submission(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
