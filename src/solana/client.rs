use anyhow::{anyhow, Result};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use std::str::FromStr;
use std::sync::Arc;

/// Create a Solana client with the given commitment ("processed", "confirmed" or "finalized")
pub fn create_solana_client(rpc_url: &str, commitment: &str) -> Result<Arc<RpcClient>> {
    let commitment = parse_commitment(commitment)?;
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), commitment);

    Ok(Arc::new(client))
}

pub fn parse_commitment(commitment: &str) -> Result<CommitmentConfig> {
    CommitmentConfig::from_str(commitment)
        .map_err(|_| anyhow!("Unknown commitment level: {}", commitment))
}
