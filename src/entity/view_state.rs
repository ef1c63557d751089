use crate::entity::PortfolioSnapshot;
use chrono::{DateTime, Utc};
use solana_sdk::pubkey::Pubkey;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading(String),
    Success(String),
    Error(String),
}

/// Application state read by the views. Only the reconciler writes it.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub status: ViewStatus,
    pub snapshot: Option<PortfolioSnapshot>,
    pub last_refreshed_at: Option<DateTime<Utc>>,
    pub refresh_passes: u64,
    pub last_mint: Option<Pubkey>,
    /// Message of the last failed refresh pass, cleared by a successful one
    pub refresh_error: Option<String>,
}
