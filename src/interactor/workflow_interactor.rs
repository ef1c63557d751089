use crate::entity::{
    MintError, MintMoreRequest, MintWorkflowRequest, StepReport, StepState, TransactionStep,
    WorkflowKind, WorkflowPlan, WorkflowReport, WorkflowState,
};
use crate::solana::tokens::{
    associated_token_address, build_create_token, build_mint_more, mint_account_sizes,
};
use crate::solana::{ChainConnection, ConfirmationStatus, IndexerProvider, WalletSigner};
use async_trait::async_trait;
use log::{error, info, warn};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Keypair, signer::Signer,
    transaction::Transaction,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;
use uuid::Uuid;

/// Told about every workflow that reaches `Done`.
#[async_trait]
pub trait WorkflowListener: Send {
    async fn workflow_done(&mut self, owner: &Pubkey, mint: &Pubkey);
}

/// Runs the multi-transaction workflows. Always returns a report; a failed
/// workflow carries its error in `WorkflowState::Failed`.
#[async_trait]
pub trait WorkflowInteractor: Send + Sync {
    async fn create_token(
        &self,
        request: MintWorkflowRequest,
        listener: &mut dyn WorkflowListener,
    ) -> WorkflowReport;

    async fn mint_more(
        &self,
        request: MintMoreRequest,
        listener: &mut dyn WorkflowListener,
    ) -> WorkflowReport;
}

#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    pub commitment: CommitmentConfig,
    /// Upper bound for each confirmation wait
    pub confirm_timeout: Duration,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            confirm_timeout: Duration::from_secs(60),
        }
    }
}

pub struct WorkflowInteractorImpl {
    chain: Arc<dyn ChainConnection>,
    indexer: Arc<dyn IndexerProvider>,
    wallet: Arc<dyn WalletSigner>,
    config: WorkflowConfig,
    in_flight: Mutex<HashSet<Pubkey>>,
}

// Transition log of one workflow
struct WorkflowRun {
    id: Uuid,
    kind: WorkflowKind,
    mint: Pubkey,
    transitions: Vec<WorkflowState>,
}

impl WorkflowRun {
    fn start(kind: WorkflowKind, mint: Pubkey) -> Self {
        let id = Uuid::new_v4();
        info!("[{}] {} workflow started for mint {}", id, kind, mint);
        Self {
            id,
            kind,
            mint,
            transitions: vec![WorkflowState::Building],
        }
    }

    fn transition(&mut self, state: WorkflowState) {
        match &state {
            WorkflowState::Failed(err) => error!("[{}] {} failed: {}", self.id, self.kind, err),
            other => info!("[{}] {} -> {:?}", self.id, self.kind, other),
        }
        self.transitions.push(state);
    }

    fn finish(mut self, steps: &[TransactionStep], state: WorkflowState) -> WorkflowReport {
        self.transition(state.clone());
        WorkflowReport {
            id: self.id,
            kind: self.kind,
            mint: self.mint,
            state,
            transitions: self.transitions,
            steps: steps
                .iter()
                .map(|step| StepReport {
                    name: step.name,
                    state: step.state,
                    signature: step.signature,
                })
                .collect(),
        }
    }

    fn fail(self, err: MintError) -> WorkflowReport {
        self.finish(&[], WorkflowState::Failed(err))
    }
}

// Keeps a mint in the in-flight set until dropped
struct MintGuard<'a> {
    in_flight: &'a Mutex<HashSet<Pubkey>>,
    mint: Pubkey,
}

impl<'a> MintGuard<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<Pubkey>>, mint: Pubkey) -> Result<Self, MintError> {
        let mut set = in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !set.insert(mint) {
            return Err(MintError::WorkflowInProgress(mint.to_string()));
        }
        Ok(Self { in_flight, mint })
    }
}

impl Drop for MintGuard<'_> {
    fn drop(&mut self) {
        let mut set = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        set.remove(&self.mint);
    }
}

impl WorkflowInteractorImpl {
    pub fn new(
        chain: Arc<dyn ChainConnection>,
        indexer: Arc<dyn IndexerProvider>,
        wallet: Arc<dyn WalletSigner>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            chain,
            indexer,
            wallet,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    async fn plan_create_token(
        &self,
        request: &MintWorkflowRequest,
        owner: &Pubkey,
        mint_keypair: Keypair,
    ) -> Result<WorkflowPlan, MintError> {
        request.validate()?;

        let sizes = mint_account_sizes(request, &mint_keypair.pubkey())?;
        let rent_lamports = self
            .chain
            .get_minimum_balance_for_rent_exemption(sizes.rent_space())
            .await?;

        build_create_token(request, owner, mint_keypair, sizes, rent_lamports)
    }

    async fn plan_mint_more(
        &self,
        request: &MintMoreRequest,
        owner: &Pubkey,
    ) -> Result<WorkflowPlan, MintError> {
        request.validate()?;

        let mint_info = self
            .indexer
            .get_mint_info(&request.mint)
            .await?
            .ok_or_else(|| {
                MintError::Validation(format!("Mint account {} not found", request.mint))
            })?;

        let associated_account = associated_token_address(owner, &request.mint);
        let account_exists = self.chain.account_exists(&associated_account).await?;

        build_mint_more(request, owner, &mint_info, account_exists)
    }

    /// Sign, submit and confirm the steps one after the other.
    async fn execute(
        &self,
        mut run: WorkflowRun,
        mut plan: WorkflowPlan,
    ) -> WorkflowReport {
        if plan.steps.is_empty() {
            return run.fail(MintError::Validation("Nothing to submit".to_string()));
        }

        let total = plan.steps.len();
        for index in 0..total {
            info!(
                "[{}] step {}/{}: {}",
                run.id,
                index + 1,
                total,
                plan.steps[index].name
            );

            let mint_signer = plan.mint_signer.as_ref();
            let result = self
                .run_step(&mut run, &mut plan.steps[index], &plan.owner, mint_signer)
                .await;

            if let Err(err) = result {
                plan.steps[index].state = StepState::Failed;
                return run.finish(&plan.steps, WorkflowState::Failed(err));
            }
        }

        run.finish(&plan.steps, WorkflowState::Done)
    }

    /// Runs after the mint is released, so the listener may start another
    /// workflow on it.
    async fn notify(
        &self,
        owner: &Pubkey,
        report: WorkflowReport,
        listener: &mut dyn WorkflowListener,
    ) -> WorkflowReport {
        if report.is_done() {
            listener.workflow_done(owner, &report.mint).await;
        }
        report
    }

    async fn run_step(
        &self,
        run: &mut WorkflowRun,
        step: &mut TransactionStep,
        owner: &Pubkey,
        mint_signer: Option<&Keypair>,
    ) -> Result<(), MintError> {
        let step_name = step.name;
        let submission = |reason: String| MintError::Submission {
            step: step_name,
            reason,
        };

        run.transition(WorkflowState::Signing);
        let latest = self
            .chain
            .get_latest_blockhash()
            .await
            .map_err(|e| submission(e.to_string()))?;

        let mut transaction = Transaction::new_with_payer(&step.instructions, Some(owner));
        if step.requires_mint_signature {
            let mint_signer = mint_signer.ok_or_else(|| {
                MintError::Validation(format!("Step '{}' needs the mint keypair", step_name))
            })?;
            transaction
                .try_partial_sign(&[mint_signer], latest.blockhash)
                .map_err(|e| submission(format!("Failed to sign with mint keypair: {}", e)))?;
        } else {
            transaction.message.recent_blockhash = latest.blockhash;
        }

        let signature = match self
            .wallet
            .send_transaction(transaction, self.chain.as_ref())
            .await
        {
            Ok(signature) => signature,
            Err(MintError::UserCancelled) => return Err(MintError::UserCancelled),
            Err(e) => return Err(submission(e.to_string())),
        };

        run.transition(WorkflowState::Submitting);
        step.state = StepState::Submitted;
        step.signature = Some(signature);
        info!("[{}] {} submitted: {}", run.id, step_name, signature);

        run.transition(WorkflowState::Confirming);
        let confirmation = timeout(
            self.config.confirm_timeout,
            self.chain.confirm_transaction(
                &signature,
                self.config.commitment,
                latest.last_valid_block_height,
            ),
        )
        .await;

        match confirmation {
            Ok(Ok(ConfirmationStatus::Confirmed)) => {
                step.state = StepState::Confirmed;
                Ok(())
            }
            Ok(Ok(ConfirmationStatus::Failed(reason))) => Err(submission(reason)),
            Ok(Err(e)) => Err(submission(e.to_string())),
            Err(_) => {
                warn!(
                    "[{}] {} not confirmed after {:?}",
                    run.id, step_name, self.config.confirm_timeout
                );
                Err(MintError::ConfirmationTimeout {
                    step: step_name,
                    timeout_secs: self.config.confirm_timeout.as_secs(),
                })
            }
        }
    }
}

#[async_trait]
impl WorkflowInteractor for WorkflowInteractorImpl {
    async fn create_token(
        &self,
        request: MintWorkflowRequest,
        listener: &mut dyn WorkflowListener,
    ) -> WorkflowReport {
        let owner = self.wallet.pubkey();
        // the one mint identity of this workflow
        let mint_keypair = Keypair::new();
        let run = WorkflowRun::start(WorkflowKind::CreateToken, mint_keypair.pubkey());

        let report = {
            let _guard = match MintGuard::acquire(&self.in_flight, mint_keypair.pubkey()) {
                Ok(guard) => guard,
                Err(e) => return run.fail(e),
            };

            let plan = match self.plan_create_token(&request, &owner, mint_keypair).await {
                Ok(plan) => plan,
                Err(e) => return run.fail(e),
            };

            self.execute(run, plan).await
        };

        self.notify(&owner, report, listener).await
    }

    async fn mint_more(
        &self,
        request: MintMoreRequest,
        listener: &mut dyn WorkflowListener,
    ) -> WorkflowReport {
        let owner = self.wallet.pubkey();
        let run = WorkflowRun::start(WorkflowKind::MintMore, request.mint);

        let report = {
            let _guard = match MintGuard::acquire(&self.in_flight, request.mint) {
                Ok(guard) => guard,
                Err(e) => return run.fail(e),
            };

            let plan = match self.plan_mint_more(&request, &owner).await {
                Ok(plan) => plan,
                Err(e) => return run.fail(e),
            };

            self.execute(run, plan).await
        };

        self.notify(&owner, report, listener).await
    }
}
