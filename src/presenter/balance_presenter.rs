use crate::presenter::reconciler::Reconciler;
use crate::view::balance_view::BalanceView;
use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

#[async_trait]
pub trait BalancePresenter: Send + Sync {
    async fn show_balances(&self, owner: &Pubkey, reconciler: &mut Reconciler) -> Result<()>;
    async fn show_mintable_tokens(&self, owner: &Pubkey, reconciler: &mut Reconciler)
        -> Result<()>;
}

pub struct BalancePresenterImpl<V> {
    view: Arc<V>,
}

impl<V> BalancePresenterImpl<V>
where
    V: BalanceView,
{
    pub fn new(view: Arc<V>) -> Self {
        Self { view }
    }
}

#[async_trait]
impl<V> BalancePresenter for BalancePresenterImpl<V>
where
    V: BalanceView + Send + Sync,
{
    async fn show_balances(&self, owner: &Pubkey, reconciler: &mut Reconciler) -> Result<()> {
        self.view.display_loading().await?;

        match reconciler.refresh(owner).await {
            Ok(()) => match &reconciler.state().snapshot {
                Some(snapshot) => self.view.display_balances(snapshot).await?,
                None => self.view.display_error("No balances available").await?,
            },
            Err(e) => self.view.display_error(&e.user_message()).await?,
        }

        Ok(())
    }

    async fn show_mintable_tokens(
        &self,
        owner: &Pubkey,
        reconciler: &mut Reconciler,
    ) -> Result<()> {
        self.view.display_loading().await?;

        match reconciler.refresh(owner).await {
            Ok(()) => match &reconciler.state().snapshot {
                Some(snapshot) => self.view.display_mintable_tokens(snapshot).await?,
                None => self.view.display_error("No balances available").await?,
            },
            Err(e) => self.view.display_error(&e.user_message()).await?,
        }

        Ok(())
    }
}
