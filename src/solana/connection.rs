use crate::entity::MintError;
use async_trait::async_trait;
use log::debug;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use solana_transaction_status::TransactionStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: Hash,
    /// Last block height at which a transaction using `blockhash` can land
    pub last_valid_block_height: u64,
}

/// Final status of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    Confirmed,
    Failed(String),
}

/// The wallet's connection to the chain.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Balance in lamports
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, MintError>;

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, MintError>;

    async fn get_minimum_balance_for_rent_exemption(&self, space: usize)
        -> Result<u64, MintError>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, MintError>;

    /// Submit a fully signed transaction without waiting for it
    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, MintError>;

    /// Wait until the transaction reaches `commitment` or reports an error.
    /// A transaction still unseen past `last_valid_block_height` can no
    /// longer land and is reported as failed. Does not time out on its own.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
        last_valid_block_height: u64,
    ) -> Result<ConfirmationStatus, MintError>;
}

pub struct RpcChainConnection {
    client: Arc<RpcClient>,
    poll_interval: Duration,
}

impl RpcChainConnection {
    pub fn new(client: Arc<RpcClient>, poll_interval: Duration) -> Self {
        Self {
            client,
            poll_interval,
        }
    }
}

fn rpc_error(context: &str, err: impl std::fmt::Display) -> MintError {
    MintError::Rpc(format!("{}: {}", context, err))
}

// None while the transaction has not reached `commitment`
fn settled(
    status: Option<&TransactionStatus>,
    commitment: CommitmentConfig,
) -> Option<ConfirmationStatus> {
    let status = status?;
    if let Some(err) = &status.err {
        return Some(ConfirmationStatus::Failed(err.to_string()));
    }
    status
        .satisfies_commitment(commitment)
        .then_some(ConfirmationStatus::Confirmed)
}

pub fn expired(last_valid_block_height: u64) -> ConfirmationStatus {
    ConfirmationStatus::Failed(format!(
        "Blockhash expired at block height {} before the transaction landed",
        last_valid_block_height
    ))
}

#[async_trait]
impl ChainConnection for RpcChainConnection {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, MintError> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| rpc_error("Failed to get balance", e))
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, MintError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.client.commitment())
            .await
            .map_err(|e| rpc_error("Failed to get recent blockhash", e))?;

        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        space: usize,
    ) -> Result<u64, MintError> {
        self.client
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .map_err(|e| rpc_error("Failed to get rent exemption", e))
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, MintError> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(|e| rpc_error("Failed to get account", e))?;

        Ok(response.value.is_some())
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, MintError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(|e| rpc_error("Failed to send transaction", e))
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: CommitmentConfig,
        last_valid_block_height: u64,
    ) -> Result<ConfirmationStatus, MintError> {
        loop {
            let response = self
                .client
                .get_signature_statuses(&[*signature])
                .await
                .map_err(|e| rpc_error("Failed to get signature status", e))?;

            let status: Option<&TransactionStatus> =
                response.value.first().and_then(|status| status.as_ref());

            if let Some(outcome) = settled(status, commitment) {
                return Ok(outcome);
            }

            if status.is_none() {
                let block_height = self
                    .client
                    .get_block_height_with_commitment(commitment)
                    .await
                    .map_err(|e| rpc_error("Failed to get block height", e))?;
                if block_height > last_valid_block_height {
                    return Ok(expired(last_valid_block_height));
                }
            }

            debug!("Signature {} not yet {:?}", signature, commitment.commitment);
            sleep(self.poll_interval).await;
        }
    }
}
