use crate::entity::MintError;
use crate::solana::indexer::models::{
    parse_envelope, Asset, KeyedParsedAccount, MintAccountInfo, ParsedAccount, RpcContextValue,
    RpcEnvelope, TokenAccountInfo,
};
use crate::solana::indexer::{AssetMetadata, IndexerProvider, MintInfo, TokenAccountRecord};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

const REQUEST_ID: &str = "onlymint";

/// JSON-RPC client for the Helius endpoint (or any provider speaking the
/// same methods).
pub struct HeliusIndexer {
    http_client: Client,
    url: String,
}

impl HeliusIndexer {
    pub fn new(url: &str) -> Self {
        Self {
            http_client: Client::new(),
            url: url.to_string(),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, MintError> {
        debug!("Indexer request: {}", method);

        let body = json!({
            "jsonrpc": "2.0",
            "id": REQUEST_ID,
            "method": method,
            "params": params,
        });

        let response = self
            .http_client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Indexer request {} failed: {}", method, e);
                MintError::Rpc(format!("Failed to reach the indexer: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Failed to read indexer response for {}: {}", method, e);
            MintError::Rpc(format!("Failed to read indexer response: {}", e))
        })?;

        if !status.is_success() {
            error!("Indexer returned HTTP {} for {}", status, method);
            // JSON-RPC providers may still put the reason in the envelope
            if let Ok(RpcEnvelope {
                error: Some(rpc_error),
                ..
            }) = serde_json::from_str::<RpcEnvelope<Value>>(&text)
            {
                return Err(MintError::Rpc(rpc_error.message));
            }
            return Err(MintError::Rpc(format!("Indexer returned HTTP {}", status)));
        }

        parse_envelope(&text).map_err(|err| {
            error!("Indexer error [{}]: {}", method, err);
            err
        })
    }
}

fn parse_pubkey(value: &str, what: &str) -> Result<Pubkey, MintError> {
    Pubkey::from_str(value)
        .map_err(|_| MintError::Rpc(format!("Indexer returned an invalid {}: {}", what, value)))
}

#[async_trait]
impl IndexerProvider for HeliusIndexer {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<TokenAccountRecord>, MintError> {
        let params = json!([
            owner.to_string(),
            { "programId": program_id.to_string() },
            { "encoding": "jsonParsed" }
        ]);

        let result: Option<RpcContextValue<Vec<KeyedParsedAccount<TokenAccountInfo>>>> =
            self.call("getTokenAccountsByOwner", params).await?;

        let accounts = match result {
            Some(result) => result.value,
            None => return Ok(Vec::new()),
        };

        accounts
            .into_iter()
            .map(|keyed| {
                let info = keyed.account.data.parsed.info;
                let raw_amount = info.token_amount.amount.parse::<u64>().map_err(|_| {
                    MintError::Rpc(format!(
                        "Indexer returned an invalid amount: {}",
                        info.token_amount.amount
                    ))
                })?;

                Ok(TokenAccountRecord {
                    address: parse_pubkey(&keyed.pubkey, "account address")?,
                    mint: parse_pubkey(&info.mint, "mint address")?,
                    raw_amount,
                    decimals: info.token_amount.decimals,
                })
            })
            .collect()
    }

    async fn get_mint_info(&self, mint: &Pubkey) -> Result<Option<MintInfo>, MintError> {
        let params = json!([mint.to_string(), { "encoding": "jsonParsed" }]);

        let result: Option<RpcContextValue<Option<ParsedAccount<MintAccountInfo>>>> =
            self.call("getAccountInfo", params).await?;

        let account = match result.and_then(|result| result.value) {
            Some(account) => account,
            None => return Ok(None),
        };

        if account.data.parsed.account_type != "mint" {
            return Err(MintError::Rpc(format!("{} is not a mint account", mint)));
        }

        let program_id = parse_pubkey(&account.owner, "mint owner")?;
        let info = account.data.parsed.info;
        let mint_authority = info
            .mint_authority
            .as_deref()
            .map(|authority| parse_pubkey(authority, "mint authority"))
            .transpose()?;

        Ok(Some(MintInfo {
            program_id,
            mint_authority,
            decimals: info.decimals,
            supply: info.supply,
        }))
    }

    async fn get_asset(&self, mint: &Pubkey) -> Result<Option<AssetMetadata>, MintError> {
        let asset: Option<Asset> = self.call("getAsset", json!([mint.to_string()])).await?;

        let metadata = asset
            .and_then(|asset| asset.content)
            .and_then(|content| content.metadata);

        Ok(metadata.map(|metadata| AssetMetadata {
            name: metadata.name.unwrap_or_default(),
            symbol: metadata.symbol.unwrap_or_default(),
        }))
    }
}
