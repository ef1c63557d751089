#![allow(dead_code)]

pub mod ledger;

use async_trait::async_trait;
use ledger::FakeLedger;
use onlymint::entity::MintError;
use onlymint::interactor::{WorkflowConfig, WorkflowListener};
use onlymint::presenter::RefreshPolicy;
use onlymint::solana::wallet::Approval;
use onlymint::solana::{ChainConnection, KeypairWallet, WalletSigner};
use onlymint::ServiceContainer;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};
use std::sync::Arc;

pub const FUNDED_LAMPORTS: u64 = 10_000_000_000;

pub struct TestContext {
    pub ledger: Arc<FakeLedger>,
    pub container: ServiceContainer,
    pub owner: Pubkey,
}

/// A funded wallet that signs without asking.
pub fn setup() -> TestContext {
    let keypair = Keypair::new();
    let owner = keypair.pubkey();
    setup_with_wallet(
        Arc::new(KeypairWallet::new(keypair, Approval::Automatic)),
        owner,
    )
}

pub fn setup_with_wallet(wallet: Arc<dyn WalletSigner>, owner: Pubkey) -> TestContext {
    let ledger = Arc::new(FakeLedger::new());
    ledger.fund(&owner, FUNDED_LAMPORTS);

    let container = ServiceContainer::from_parts(
        ledger.clone(),
        ledger.clone(),
        wallet,
        WorkflowConfig::default(),
        RefreshPolicy::default(),
    );

    TestContext {
        ledger,
        container,
        owner,
    }
}

/// Wallet whose user declines every signature request.
pub struct DecliningWallet {
    pub owner: Pubkey,
}

#[async_trait]
impl WalletSigner for DecliningWallet {
    fn pubkey(&self) -> Pubkey {
        self.owner
    }

    async fn send_transaction(
        &self,
        _transaction: Transaction,
        _connection: &dyn ChainConnection,
    ) -> Result<Signature, MintError> {
        Err(MintError::UserCancelled)
    }
}

/// Listener that only records which workflows finished.
#[derive(Default)]
pub struct RecordingListener {
    pub done: Vec<Pubkey>,
}

#[async_trait]
impl WorkflowListener for RecordingListener {
    async fn workflow_done(&mut self, _owner: &Pubkey, mint: &Pubkey) {
        self.done.push(*mint);
    }
}
