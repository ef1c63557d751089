use crate::entity::MintError;
use crate::solana::connection::ChainConnection;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::info;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// The user's wallet: signs transactions and hands them to the connection.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Sign `transaction` as fee payer and submit it. Fails with
    /// `MintError::UserCancelled` if the user declines.
    async fn send_transaction(
        &self,
        transaction: Transaction,
        connection: &dyn ChainConnection,
    ) -> Result<Signature, MintError>;
}

/// How the keypair wallet asks for permission to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Automatic,
    Terminal,
}

/// Wallet backed by a local keypair.
pub struct KeypairWallet {
    keypair: Keypair,
    approval: Approval,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, approval: Approval) -> Self {
        Self { keypair, approval }
    }

    async fn approve(&self, transaction: &Transaction) -> Result<bool, MintError> {
        if self.approval == Approval::Automatic {
            return Ok(true);
        }

        let prompt = format!(
            "Sign transaction with {} instruction(s) from {}? [y/N] ",
            transaction.message.instructions.len(),
            self.keypair.pubkey()
        );

        tokio::task::spawn_blocking(move || ask_terminal(&prompt))
            .await
            .map_err(|e| MintError::Rpc(format!("Approval prompt failed: {}", e)))?
            .map_err(|e| MintError::Rpc(format!("Approval prompt failed: {}", e)))
    }
}

fn ask_terminal(prompt: &str) -> io::Result<bool> {
    let mut stdout = io::stdout();
    stdout.write_all(prompt.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    async fn send_transaction(
        &self,
        mut transaction: Transaction,
        connection: &dyn ChainConnection,
    ) -> Result<Signature, MintError> {
        if !self.approve(&transaction).await? {
            info!("User declined to sign");
            return Err(MintError::UserCancelled);
        }

        let recent_blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], recent_blockhash)
            .map_err(|e| MintError::Rpc(format!("Failed to sign transaction: {}", e)))?;

        if !transaction.is_signed() {
            return Err(MintError::Rpc(
                "Transaction is missing required signatures".to_string(),
            ));
        }

        connection.send_transaction(&transaction).await
    }
}

/// Serialize Keypair (64 bytes) to base58.
pub fn keypair_to_base58(keypair: &Keypair) -> String {
    bs58::encode(keypair.to_bytes()).into_string()
}

/// Restore Keypair from base58 string (64 bytes).
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair> {
    let keypair_bytes = bs58::decode(keypair_base58.trim())
        .into_vec()
        .map_err(|e| anyhow!("Failed to decode base58 keypair: {}", e))?;

    keypair_from_bytes(&keypair_bytes)
}

/// Read a keypair file in the Solana CLI format (JSON array of 64 bytes).
pub fn keypair_from_json_file(path: &Path) -> Result<Keypair> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read keypair file {}", path.display()))?;
    let keypair_bytes: Vec<u8> = serde_json::from_str(&contents)
        .with_context(|| format!("Keypair file {} is not a JSON byte array", path.display()))?;

    keypair_from_bytes(&keypair_bytes)
}

fn keypair_from_bytes(keypair_bytes: &[u8]) -> Result<Keypair> {
    if keypair_bytes.len() != 64 {
        return Err(anyhow!("Invalid keypair length: {}", keypair_bytes.len()));
    }

    Keypair::from_bytes(keypair_bytes)
        .map_err(|e| anyhow!("Failed to create keypair from bytes: {}", e))
}
