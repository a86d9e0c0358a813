mod currency;
mod event;
mod presale_error;
mod refresh;
mod session;
mod state;
mod transaction;

pub use currency::{Currency, CurrencyBook, CurrencyInfo};
pub use event::{Event, UserIntent};
pub use presale_error::PresaleError;
pub use refresh::{CurrencyReading, RefreshOutcome, RefreshToken};
pub use session::{ApproveOrder, BuyOrder, CurrencyView, Session, SessionSnapshot, DEFAULT_AMOUNT};
pub use state::{Phase, TransitionState};
pub use transaction::{TxKind, TxRecord, TxStatus};
