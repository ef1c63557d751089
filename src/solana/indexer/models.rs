// src/solana/indexer/models.rs
use crate::entity::MintError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use solana_account_decoder::parse_token::UiTokenAmount;
use solana_sdk::pubkey::Pubkey;

/// A token account as reported by the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountRecord {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub raw_amount: u64,
    pub decimals: u8,
}

/// The parts of a mint account the app cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintInfo {
    /// Token program that owns the mint account
    pub program_id: Pubkey,
    pub mint_authority: Option<Pubkey>,
    pub decimals: u8,
    pub supply: u64,
}

impl MintInfo {
    /// Only Token-2022 mints can be minted through this client.
    pub fn is_token_2022(&self) -> bool {
        self.program_id == spl_token_2022::id()
    }

    pub fn mintable_by(&self, owner: &Pubkey) -> bool {
        self.is_token_2022() && self.mint_authority == Some(*owner)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMetadata {
    pub name: String,
    pub symbol: String,
}

// JSON-RPC wire format

#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorBody {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

impl<T> RpcEnvelope<T> {
    /// The provider's `error.message` becomes the failure string.
    pub fn into_result(self) -> Result<Option<T>, MintError> {
        match self.error {
            Some(error) => Err(MintError::Rpc(error.message)),
            None => Ok(self.result),
        }
    }
}

/// Decode a JSON-RPC response body.
pub fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>, MintError> {
    let envelope: RpcEnvelope<T> = serde_json::from_str(body)
        .map_err(|e| MintError::Rpc(format!("Failed to parse indexer response: {}", e)))?;
    envelope.into_result()
}

#[derive(Debug, Deserialize)]
pub struct RpcContextValue<T> {
    pub value: T,
}

#[derive(Debug, Deserialize)]
pub struct KeyedParsedAccount<I> {
    pub pubkey: String,
    pub account: ParsedAccount<I>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedAccount<I> {
    pub data: ParsedAccountData<I>,
    /// Owning program
    pub owner: String,
}

#[derive(Debug, Deserialize)]
pub struct ParsedAccountData<I> {
    pub parsed: ParsedInfo<I>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedInfo<I> {
    pub info: I,
    #[serde(rename = "type")]
    pub account_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub mint: String,
    pub owner: String,
    pub token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintAccountInfo {
    pub mint_authority: Option<String>,
    pub decimals: u8,
    #[serde(with = "string_u64")]
    pub supply: u64,
}

#[derive(Debug, Deserialize)]
pub struct Asset {
    pub content: Option<AssetContent>,
}

#[derive(Debug, Deserialize)]
pub struct AssetContent {
    pub metadata: Option<AssetContentMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct AssetContentMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

// Amounts arrive as decimal strings to survive JSON number precision
pub mod string_u64 {
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Number(u64),
        }

        match StringOrNumber::deserialize(deserializer)? {
            StringOrNumber::String(s) => s.parse::<u64>().map_err(de::Error::custom),
            StringOrNumber::Number(n) => Ok(n),
        }
    }
}
