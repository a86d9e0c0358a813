pub mod confirmation_service;
pub mod wallet_watcher;

pub use confirmation_service::ConfirmationService;
pub use wallet_watcher::WalletWatcher;
