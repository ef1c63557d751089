pub mod balance_interactor;
pub mod workflow_interactor;

pub use balance_interactor::{BalanceInteractor, BalanceInteractorImpl};
pub use workflow_interactor::{
    WorkflowConfig, WorkflowInteractor, WorkflowInteractorImpl, WorkflowListener,
};
