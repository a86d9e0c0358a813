pub mod client;
pub mod config;
pub mod contracts;
pub mod read_service;
pub mod receipt_service;
pub mod transaction_service;
pub mod wallet;

// Re-export commonly used items
pub use client::{create_provider, signer_from_hex};
pub use config::ChainConfig;
pub use read_service::{ReadCall, ReadService, RpcReadService};
pub use receipt_service::{ReceiptService, RpcReceiptService};
pub use transaction_service::{RpcTransactionService, TransactionService};
pub use wallet::{Connection, LocalWalletConnector, WalletConnector};
