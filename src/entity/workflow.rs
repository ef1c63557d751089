use crate::entity::MintError;
use crate::solana::tokens::constants::{DEFAULT_METADATA_URI, TOKEN_DECIMALS};
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Keypair, signature::Signature,
};
use std::fmt;
use uuid::Uuid;

/// Input of the create-token workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintWorkflowRequest {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_supply: u64,
    pub metadata_uri: String,
    pub grant_mint_authority_to_creator: bool,
}

impl Default for MintWorkflowRequest {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            decimals: TOKEN_DECIMALS,
            initial_supply: 1,
            metadata_uri: DEFAULT_METADATA_URI.to_string(),
            grant_mint_authority_to_creator: true,
        }
    }
}

impl MintWorkflowRequest {
    pub fn new(name: &str, symbol: &str, initial_supply: u64) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            initial_supply,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), MintError> {
        if self.name.trim().is_empty() {
            return Err(MintError::Validation("Token name is required".to_string()));
        }
        if self.symbol.trim().is_empty() {
            return Err(MintError::Validation("Token symbol is required".to_string()));
        }
        if self.decimals != TOKEN_DECIMALS {
            return Err(MintError::Validation(format!(
                "Tokens are created with {} decimals",
                TOKEN_DECIMALS
            )));
        }
        if self.metadata_uri.trim().is_empty() {
            return Err(MintError::Validation("Metadata URI is required".to_string()));
        }
        if self.grant_mint_authority_to_creator {
            if self.initial_supply == 0 {
                return Err(MintError::Validation(
                    "Initial supply must be greater than zero".to_string(),
                ));
            }
            crate::solana::utils::to_base_units(self.initial_supply, self.decimals)?;
        }
        Ok(())
    }
}

/// Input of the mint-more workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintMoreRequest {
    pub mint: Pubkey,
    pub amount: u64,
}

impl MintMoreRequest {
    pub fn validate(&self) -> Result<(), MintError> {
        if self.amount == 0 {
            return Err(MintError::Validation("Invalid mint amount".to_string()));
        }
        crate::solana::utils::to_base_units(self.amount, TOKEN_DECIMALS)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepName {
    CreateMint,
    CreateAssociatedAccount,
    MintSupply,
}

impl StepName {
    /// Verb phrase used in user-facing messages.
    pub fn action(&self) -> &'static str {
        match self {
            StepName::CreateMint => "create the token mint",
            StepName::CreateAssociatedAccount => "create the token account",
            StepName::MintSupply => "mint tokens",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StepName::CreateMint => "create mint",
            StepName::CreateAssociatedAccount => "create associated account",
            StepName::MintSupply => "mint supply",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

/// One transaction of a workflow.
#[derive(Debug, Clone)]
pub struct TransactionStep {
    pub name: StepName,
    pub instructions: Vec<Instruction>,
    /// The mint keypair has to co-sign this step.
    pub requires_mint_signature: bool,
    pub state: StepState,
    pub signature: Option<Signature>,
}

impl TransactionStep {
    pub fn new(name: StepName, instructions: Vec<Instruction>) -> Self {
        Self {
            name,
            instructions,
            requires_mint_signature: false,
            state: StepState::Pending,
            signature: None,
        }
    }

    pub fn signed_by_mint(mut self) -> Self {
        self.requires_mint_signature = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    CreateToken,
    MintMore,
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowKind::CreateToken => f.write_str("create-token"),
            WorkflowKind::MintMore => f.write_str("mint-more"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Building,
    Signing,
    Submitting,
    Confirming,
    Done,
    Failed(MintError),
}

/// Ordered steps sharing one mint identity.
#[derive(Debug)]
pub struct WorkflowPlan {
    pub kind: WorkflowKind,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub mint_signer: Option<Keypair>,
    pub steps: Vec<TransactionStep>,
}

impl WorkflowPlan {
    pub fn new(kind: WorkflowKind, owner: Pubkey, mint: Pubkey) -> Self {
        Self {
            kind,
            owner,
            mint,
            mint_signer: None,
            steps: Vec::new(),
        }
    }

    pub fn step_names(&self) -> Vec<StepName> {
        self.steps.iter().map(|step| step.name).collect()
    }
}

/// Outcome of a finished workflow.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub id: Uuid,
    pub kind: WorkflowKind,
    pub mint: Pubkey,
    pub state: WorkflowState,
    pub transitions: Vec<WorkflowState>,
    pub steps: Vec<StepReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub name: StepName,
    pub state: StepState,
    pub signature: Option<Signature>,
}

impl WorkflowReport {
    pub fn is_done(&self) -> bool {
        self.state == WorkflowState::Done
    }

    pub fn error(&self) -> Option<&MintError> {
        match &self.state {
            WorkflowState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn failed_step(&self) -> Option<StepName> {
        self.steps
            .iter()
            .find(|step| step.state == StepState::Failed)
            .map(|step| step.name)
    }

    pub fn signatures(&self) -> Vec<Signature> {
        self.steps.iter().filter_map(|step| step.signature).collect()
    }
}
