use crate::entity::TokenAsset;
use solana_sdk::pubkey::Pubkey;

/// Everything the views read about a wallet. A refresh produces a new
/// snapshot that replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSnapshot {
    pub owner: Pubkey,
    pub sol_lamports: u64,
    pub tokens: Vec<TokenAsset>,
}

impl PortfolioSnapshot {
    pub fn token(&self, mint: &Pubkey) -> Option<&TokenAsset> {
        self.tokens.iter().find(|token| &token.mint == mint)
    }

    /// Tokens with a non-zero balance.
    pub fn held_tokens(&self) -> impl Iterator<Item = &TokenAsset> {
        self.tokens.iter().filter(|token| token.raw_balance > 0)
    }

    /// Tokens the owner can mint more of.
    pub fn mintable_tokens(&self) -> impl Iterator<Item = &TokenAsset> {
        self.tokens.iter().filter(|token| token.has_mint_authority)
    }
}
