mod mint_error;
mod snapshot;
mod token_asset;
mod view_state;
mod workflow;

pub use mint_error::MintError;
pub use snapshot::PortfolioSnapshot;
pub use token_asset::{TokenAsset, UNKNOWN_TOKEN_NAME, UNKNOWN_TOKEN_SYMBOL};
pub use view_state::{AppState, ViewStatus};
pub use workflow::{
    MintMoreRequest, MintWorkflowRequest, StepName, StepReport, StepState, TransactionStep,
    WorkflowKind, WorkflowPlan, WorkflowReport, WorkflowState,
};
