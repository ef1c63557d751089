// src/solana/indexer/mod.rs
pub mod helius;
pub mod models;

use crate::entity::MintError;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;

pub use helius::HeliusIndexer;
pub use models::{AssetMetadata, MintInfo, TokenAccountRecord};

/// Queryable views over chain state, served by an indexer such as Helius.
#[async_trait]
pub trait IndexerProvider: Send + Sync {
    /// Token accounts of `owner` that belong to `program_id`
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<TokenAccountRecord>, MintError>;

    /// Parsed mint account, `None` if the account does not exist
    async fn get_mint_info(&self, mint: &Pubkey) -> Result<Option<MintInfo>, MintError>;

    /// Name and symbol of an asset, `None` if the provider has none
    async fn get_asset(&self, mint: &Pubkey) -> Result<Option<AssetMetadata>, MintError>;
}
