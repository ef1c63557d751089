use crate::entity::{AppState, MintError, ViewStatus, WorkflowReport};
use crate::interactor::{BalanceInteractor, WorkflowListener};
use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// When to re-read balances after a successful workflow. The indexer lags
/// behind the chain, so one immediate pass is followed by delayed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub delay: Duration,
    pub delayed_passes: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(3000),
            delayed_passes: 1,
        }
    }
}

/// Owns the application state and keeps it in line with the chain.
pub struct Reconciler {
    interactor: Arc<dyn BalanceInteractor>,
    policy: RefreshPolicy,
    state: AppState,
}

impl Reconciler {
    pub fn new(interactor: Arc<dyn BalanceInteractor>, policy: RefreshPolicy) -> Self {
        Self {
            interactor,
            policy,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn begin(&mut self, message: &str) {
        self.state.status = ViewStatus::Loading(message.to_string());
    }

    /// User-requested refresh.
    pub async fn refresh(&mut self, owner: &Pubkey) -> Result<(), MintError> {
        self.begin("Refreshing balances...");
        match self.refresh_pass(owner).await {
            Ok(()) => {
                self.state.status = ViewStatus::Idle;
                Ok(())
            }
            Err(e) => {
                self.state.status = ViewStatus::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Turn a finished workflow into the status line. A workflow that landed
    /// while the balance refresh failed still reports the refresh error.
    pub fn record_report(&mut self, report: &WorkflowReport, success_message: String) {
        self.state.status = match (report.error(), &self.state.refresh_error) {
            (Some(err), _) => ViewStatus::Error(err.user_message()),
            (None, Some(refresh_error)) => ViewStatus::Error(format!(
                "{}, but balances could not be refreshed: {}",
                success_message, refresh_error
            )),
            (None, None) => ViewStatus::Success(success_message),
        };
    }

    pub fn record_error(&mut self, err: &MintError) {
        self.state.status = ViewStatus::Error(err.user_message());
    }

    // One read; the new snapshot replaces the old one as a whole
    async fn refresh_pass(&mut self, owner: &Pubkey) -> Result<(), MintError> {
        let snapshot = match self.interactor.fetch_snapshot(owner).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                self.state.refresh_error = Some(e.user_message());
                return Err(e);
            }
        };
        self.state.snapshot = Some(snapshot);
        self.state.last_refreshed_at = Some(Utc::now());
        self.state.refresh_passes += 1;
        self.state.refresh_error = None;
        Ok(())
    }
}

#[async_trait]
impl WorkflowListener for Reconciler {
    async fn workflow_done(&mut self, owner: &Pubkey, mint: &Pubkey) {
        self.state.last_mint = Some(*mint);

        if let Err(e) = self.refresh_pass(owner).await {
            warn!("Refresh after workflow on {} failed: {}", mint, e);
        }

        for pass in 1..=self.policy.delayed_passes {
            sleep(self.policy.delay).await;
            info!(
                "Delayed refresh {}/{} for mint {}",
                pass, self.policy.delayed_passes, mint
            );
            if let Err(e) = self.refresh_pass(owner).await {
                warn!("Delayed refresh for {} failed: {}", mint, e);
            }
        }
    }
}
