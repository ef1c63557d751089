use std::sync::Arc;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;

use crate::entity::MintError;
use crate::interactor::{BalanceInteractorImpl, WorkflowConfig, WorkflowInteractorImpl};
use crate::presenter::{Reconciler, RefreshPolicy};
use crate::settings::Settings;
use crate::solana::wallet::Approval;
use crate::solana::{
    create_solana_client, ChainConnection, HeliusIndexer, IndexerProvider, KeypairWallet,
    RpcChainConnection, WalletSigner,
};

/// ServiceContainer wires the chain, the indexer and the wallet into the
/// interactors
pub struct ServiceContainer {
    chain: Arc<dyn ChainConnection>,
    indexer: Arc<dyn IndexerProvider>,
    wallet: Arc<dyn WalletSigner>,

    balance_interactor: Arc<BalanceInteractorImpl>,
    workflow_interactor: Arc<WorkflowInteractorImpl>,

    refresh_policy: RefreshPolicy,
}

impl ServiceContainer {
    /// Build the production services from settings
    pub fn new(settings: &Settings, approval: Approval) -> Result<Self, MintError> {
        let solana_client: Arc<RpcClient> =
            create_solana_client(&settings.rpc_url, &settings.commitment)
                .map_err(|e| MintError::Configuration(e.to_string()))?;

        let chain = Arc::new(RpcChainConnection::new(
            solana_client,
            settings.poll_interval(),
        )) as Arc<dyn ChainConnection>;
        let indexer =
            Arc::new(HeliusIndexer::new(&settings.indexer_url)) as Arc<dyn IndexerProvider>;
        let wallet = Arc::new(KeypairWallet::new(
            settings.load_wallet_keypair()?,
            approval,
        )) as Arc<dyn WalletSigner>;

        Ok(Self::from_parts(
            chain,
            indexer,
            wallet,
            settings.workflow_config()?,
            settings.refresh_policy(),
        ))
    }

    /// Wire the interactors over already constructed services
    pub fn from_parts(
        chain: Arc<dyn ChainConnection>,
        indexer: Arc<dyn IndexerProvider>,
        wallet: Arc<dyn WalletSigner>,
        workflow_config: WorkflowConfig,
        refresh_policy: RefreshPolicy,
    ) -> Self {
        let balance_interactor = Arc::new(BalanceInteractorImpl::new(
            chain.clone(),
            indexer.clone(),
        ));
        let workflow_interactor = Arc::new(WorkflowInteractorImpl::new(
            chain.clone(),
            indexer.clone(),
            wallet.clone(),
            workflow_config,
        ));

        Self {
            chain,
            indexer,
            wallet,
            balance_interactor,
            workflow_interactor,
            refresh_policy,
        }
    }

    // Accessor methods

    pub fn owner(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    pub fn chain(&self) -> Arc<dyn ChainConnection> {
        self.chain.clone()
    }

    pub fn indexer(&self) -> Arc<dyn IndexerProvider> {
        self.indexer.clone()
    }

    pub fn balance_interactor(&self) -> Arc<BalanceInteractorImpl> {
        self.balance_interactor.clone()
    }

    pub fn workflow_interactor(&self) -> Arc<WorkflowInteractorImpl> {
        self.workflow_interactor.clone()
    }

    /// A fresh reconciler owning an empty application state
    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.balance_interactor.clone(), self.refresh_policy)
    }
}
