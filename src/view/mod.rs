pub mod presale_view;

pub use presale_view::{ConsoleView, PresaleView};
