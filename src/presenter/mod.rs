pub mod balance_presenter;
pub mod reconciler;
pub mod token_presenter;

pub use balance_presenter::{BalancePresenter, BalancePresenterImpl};
pub use reconciler::{Reconciler, RefreshPolicy};
pub use token_presenter::{TokenPresenter, TokenPresenterImpl};
