pub mod presale_presenter;

pub use presale_presenter::{PresalePresenter, PresalePresenterImpl};
