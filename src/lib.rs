//! Approve-then-buy client for the AXXIS token presale.
//!
//! The [`entity::Session`] holds the whole page state and changes only through
//! its transition methods. [`presenter::PresalePresenterImpl`] owns the session,
//! feeds it events from one channel and spawns the chain work the transitions
//! ask for.
pub mod chain;
pub mod commands;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod services;
pub mod utils;
pub mod view;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used items
pub use chain::ChainConfig;
pub use commands::parse_intent;
pub use di::ServiceContainer;
pub use entity::{Currency, Event, PresaleError, Session, SessionSnapshot, TransitionState, UserIntent};
pub use presenter::{PresalePresenter, PresalePresenterImpl};
pub use view::{ConsoleView, PresaleView};
