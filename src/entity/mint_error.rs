use crate::entity::StepName;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MintError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Missing mint authority: {0}")]
    Authorization(String),

    #[error("Transaction was rejected in the wallet")]
    UserCancelled,

    #[error("Step '{step}' failed: {reason}")]
    Submission { step: StepName, reason: String },

    #[error("Step '{step}' was not confirmed within {timeout_secs}s")]
    ConfirmationTimeout { step: StepName, timeout_secs: u64 },

    #[error("Metadata unavailable for {0}")]
    MetadataUnavailable(String),

    #[error("RPC provider error: {0}")]
    Rpc(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Another workflow is already running for mint {0}")]
    WorkflowInProgress(String),
}

impl MintError {
    /// Message shown to the user. Provider and step details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            MintError::Validation(reason) => reason.clone(),
            MintError::Authorization(_) => {
                "You don't have mint authority for this token".to_string()
            }
            MintError::UserCancelled => "Transaction cancelled in the wallet".to_string(),
            MintError::Submission { step, .. } => {
                format!("Failed to {}. Please try again.", step.action())
            }
            MintError::ConfirmationTimeout { step, .. } => format!(
                "Timed out waiting for the network to confirm: {}. Check your wallet before retrying.",
                step.action()
            ),
            MintError::MetadataUnavailable(_) => "Token metadata is unavailable".to_string(),
            MintError::Rpc(message) => message.clone(),
            MintError::Configuration(reason) => reason.clone(),
            MintError::WorkflowInProgress(_) => {
                "A transaction for this token is already in progress".to_string()
            }
        }
    }
}
