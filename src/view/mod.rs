pub mod balance_view;
pub mod token_view;

pub use balance_view::{BalanceView, TerminalBalanceView};
pub use token_view::{TerminalTokenView, TokenView};
