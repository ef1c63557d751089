use crate::solana::utils::format_balance;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

pub const UNKNOWN_TOKEN_NAME: &str = "Unknown Token";
pub const UNKNOWN_TOKEN_SYMBOL: &str = "UNK";

/// A token held by the wallet, as of the last refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAsset {
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub raw_balance: u64,
    pub has_mint_authority: bool,
}

impl TokenAsset {
    /// `raw_balance / 10^decimals`
    pub fn balance(&self) -> Decimal {
        crate::solana::utils::from_base_units(self.raw_balance, self.decimals)
    }

    pub fn formatted_balance(&self) -> String {
        format_balance(self.raw_balance, self.decimals)
    }

    pub fn has_placeholder_metadata(&self) -> bool {
        self.name == UNKNOWN_TOKEN_NAME && self.symbol == UNKNOWN_TOKEN_SYMBOL
    }
}
