use crate::entity::{
    MintError, PortfolioSnapshot, TokenAsset, UNKNOWN_TOKEN_NAME, UNKNOWN_TOKEN_SYMBOL,
};
use crate::solana::indexer::{AssetMetadata, IndexerProvider, TokenAccountRecord};
use crate::solana::ChainConnection;
use async_trait::async_trait;
use log::{info, warn};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

#[async_trait]
pub trait BalanceInteractor: Send + Sync {
    /// Read SOL and token balances of `owner`. Metadata problems never fail
    /// the whole query.
    async fn fetch_snapshot(&self, owner: &Pubkey) -> Result<PortfolioSnapshot, MintError>;
}

pub struct BalanceInteractorImpl {
    chain: Arc<dyn ChainConnection>,
    indexer: Arc<dyn IndexerProvider>,
    token_programs: Vec<Pubkey>,
}

impl BalanceInteractorImpl {
    /// Lists accounts of the Token-2022 and the legacy SPL Token program.
    pub fn new(chain: Arc<dyn ChainConnection>, indexer: Arc<dyn IndexerProvider>) -> Self {
        Self::with_token_programs(chain, indexer, vec![spl_token_2022::id(), spl_token::id()])
    }

    pub fn with_token_programs(
        chain: Arc<dyn ChainConnection>,
        indexer: Arc<dyn IndexerProvider>,
        token_programs: Vec<Pubkey>,
    ) -> Self {
        Self {
            chain,
            indexer,
            token_programs,
        }
    }

    async fn resolve_metadata(&self, mint: &Pubkey) -> Result<AssetMetadata, MintError> {
        let asset = self
            .indexer
            .get_asset(mint)
            .await
            .map_err(|e| MintError::MetadataUnavailable(format!("{}: {}", mint, e)))?
            .ok_or_else(|| MintError::MetadataUnavailable(mint.to_string()))?;

        Ok(AssetMetadata {
            name: non_empty_or(asset.name, UNKNOWN_TOKEN_NAME),
            symbol: non_empty_or(asset.symbol, UNKNOWN_TOKEN_SYMBOL),
        })
    }

    async fn has_mint_authority(&self, owner: &Pubkey, mint: &Pubkey) -> bool {
        match self.indexer.get_mint_info(mint).await {
            Ok(Some(info)) => info.mintable_by(owner),
            Ok(None) => {
                warn!("Mint account {} not found", mint);
                false
            }
            Err(e) => {
                warn!("Could not read mint authority of {}: {}", mint, e);
                false
            }
        }
    }

    async fn to_asset(&self, owner: &Pubkey, account: TokenAccountRecord) -> TokenAsset {
        let metadata = match self.resolve_metadata(&account.mint).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Could not fetch metadata for token: {}", e);
                AssetMetadata {
                    name: UNKNOWN_TOKEN_NAME.to_string(),
                    symbol: UNKNOWN_TOKEN_SYMBOL.to_string(),
                }
            }
        };

        TokenAsset {
            mint: account.mint,
            name: metadata.name,
            symbol: metadata.symbol,
            decimals: account.decimals,
            raw_balance: account.raw_amount,
            has_mint_authority: self.has_mint_authority(owner, &account.mint).await,
        }
    }
}

fn non_empty_or(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

#[async_trait]
impl BalanceInteractor for BalanceInteractorImpl {
    async fn fetch_snapshot(&self, owner: &Pubkey) -> Result<PortfolioSnapshot, MintError> {
        let sol_lamports = self.chain.get_balance(owner).await?;

        let mut tokens = Vec::new();
        for program_id in &self.token_programs {
            let accounts = self
                .indexer
                .get_token_accounts_by_owner(owner, program_id)
                .await?;

            for account in accounts {
                tokens.push(self.to_asset(owner, account).await);
            }
        }

        info!(
            "Fetched balances of {}: {} lamports, {} token account(s)",
            owner,
            sol_lamports,
            tokens.len()
        );

        Ok(PortfolioSnapshot {
            owner: *owner,
            sol_lamports,
            tokens,
        })
    }
}
