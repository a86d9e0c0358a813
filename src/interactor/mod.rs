pub mod purchase_interactor;
pub mod refresh_interactor;

pub use purchase_interactor::{PurchaseInteractor, PurchaseInteractorImpl};
pub use refresh_interactor::{RefreshInteractor, RefreshInteractorImpl};
