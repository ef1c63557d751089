use crate::entity::{PortfolioSnapshot, TokenAsset};
use crate::solana::tokens::constants::SOL_DECIMALS;
use crate::solana::utils::format_balance;
use crate::utils::shorten_address;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait BalanceView: Send + Sync {
    async fn display_loading(&self) -> Result<()>;
    async fn display_balances(&self, snapshot: &PortfolioSnapshot) -> Result<()>;
    async fn display_mintable_tokens(&self, snapshot: &PortfolioSnapshot) -> Result<()>;
    async fn display_error(&self, error_message: &str) -> Result<()>;
}

pub struct TerminalBalanceView;

impl TerminalBalanceView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TerminalBalanceView {
    fn default() -> Self {
        Self::new()
    }
}

fn token_line(token: &TokenAsset) -> String {
    format!(
        "  {} ({}): {}  [{}]",
        token.name,
        token.symbol,
        token.formatted_balance(),
        shorten_address(&token.mint.to_string())
    )
}

/// Wallet header, SOL balance and every token with a non-zero balance.
pub fn format_balances_text(snapshot: &PortfolioSnapshot) -> String {
    let mut text = format!(
        "Wallet: {}\nSOL: {}\n",
        snapshot.owner,
        format_balance(snapshot.sol_lamports, SOL_DECIMALS)
    );

    let held: Vec<&TokenAsset> = snapshot.held_tokens().collect();
    if held.is_empty() {
        text.push_str("No tokens found\n");
        return text;
    }

    text.push_str("Tokens:\n");
    for token in held {
        text.push_str(&token_line(token));
        text.push('\n');
    }
    text
}

pub fn format_mintable_tokens_text(snapshot: &PortfolioSnapshot) -> String {
    let mintable: Vec<&TokenAsset> = snapshot.mintable_tokens().collect();
    if mintable.is_empty() {
        return "You don't have mint authority for any token\n".to_string();
    }

    let mut text = String::from("Tokens you can mint:\n");
    for token in mintable {
        text.push_str(&format!(
            "  {} ({}) {}: balance {}\n",
            token.name,
            token.symbol,
            token.mint,
            token.formatted_balance()
        ));
    }
    text
}

#[async_trait]
impl BalanceView for TerminalBalanceView {
    async fn display_loading(&self) -> Result<()> {
        println!("Loading balances...");
        Ok(())
    }

    async fn display_balances(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        print!("{}", format_balances_text(snapshot));
        Ok(())
    }

    async fn display_mintable_tokens(&self, snapshot: &PortfolioSnapshot) -> Result<()> {
        print!("{}", format_mintable_tokens_text(snapshot));
        Ok(())
    }

    async fn display_error(&self, error_message: &str) -> Result<()> {
        eprintln!("Error: {}", error_message);
        Ok(())
    }
}
