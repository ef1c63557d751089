use crate::entity::{MintMoreRequest, MintWorkflowRequest, WorkflowReport};
use crate::interactor::WorkflowInteractor;
use crate::presenter::reconciler::Reconciler;
use crate::view::token_view::TokenView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait TokenPresenter: Send + Sync {
    async fn create_token(
        &self,
        request: MintWorkflowRequest,
        reconciler: &mut Reconciler,
    ) -> Result<WorkflowReport>;

    async fn mint_more(
        &self,
        request: MintMoreRequest,
        reconciler: &mut Reconciler,
    ) -> Result<WorkflowReport>;
}

pub struct TokenPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> TokenPresenterImpl<I, V>
where
    I: WorkflowInteractor,
    V: TokenView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }

    async fn present(&self, report: &WorkflowReport, reconciler: &mut Reconciler) -> Result<()> {
        let success_message = format!("{} finished for {}", report.kind, report.mint);
        reconciler.record_report(report, success_message);

        match report.error() {
            None => {
                self.view
                    .display_workflow_done(report, reconciler.state())
                    .await?
            }
            Some(err) => {
                self.view
                    .display_workflow_failed(report, &err.user_message())
                    .await?
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<I, V> TokenPresenter for TokenPresenterImpl<I, V>
where
    I: WorkflowInteractor + Send + Sync,
    V: TokenView + Send + Sync,
{
    async fn create_token(
        &self,
        request: MintWorkflowRequest,
        reconciler: &mut Reconciler,
    ) -> Result<WorkflowReport> {
        let message = format!("Creating token {} ({})...", request.name, request.symbol);
        reconciler.begin(&message);
        self.view.display_loading(&message).await?;

        let report = self.interactor.create_token(request, reconciler).await;
        self.present(&report, reconciler).await?;
        Ok(report)
    }

    async fn mint_more(
        &self,
        request: MintMoreRequest,
        reconciler: &mut Reconciler,
    ) -> Result<WorkflowReport> {
        let message = format!("Minting {} tokens of {}...", request.amount, request.mint);
        reconciler.begin(&message);
        self.view.display_loading(&message).await?;

        let report = self.interactor.mint_more(request, reconciler).await;
        self.present(&report, reconciler).await?;
        Ok(report)
    }
}
