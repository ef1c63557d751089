use crate::entity::{
    MintError, MintMoreRequest, MintWorkflowRequest, StepName, TransactionStep, WorkflowKind,
    WorkflowPlan,
};
use crate::solana::indexer::MintInfo;
use crate::solana::utils::to_base_units;
use solana_sdk::{
    instruction::Instruction, program_error::ProgramError, pubkey::Pubkey, signature::Keypair,
    signer::Signer, system_instruction,
};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id,
    instruction::create_associated_token_account,
};
use spl_token_2022::{
    extension::{metadata_pointer, ExtensionType},
    instruction as token_instruction,
    state::Mint,
};
use spl_token_metadata_interface::{instruction as metadata_instruction, state::TokenMetadata};

/// Space of a Token-2022 mint account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintAccountSizes {
    /// Allocated up front: base mint plus the metadata pointer extension
    pub mint_space: usize,
    /// Appended later by the metadata initialize instruction
    pub metadata_space: usize,
}

impl MintAccountSizes {
    /// Rent has to cover the metadata the account grows into.
    pub fn rent_space(&self) -> usize {
        self.mint_space + self.metadata_space
    }
}

fn build_error(what: &str, err: ProgramError) -> MintError {
    MintError::Validation(format!("Failed to build {} instruction: {}", what, err))
}

/// Associated Token-2022 account of `owner` for `mint`.
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::id())
}

pub fn mint_account_sizes(
    request: &MintWorkflowRequest,
    mint: &Pubkey,
) -> Result<MintAccountSizes, MintError> {
    let mint_space =
        ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])
            .map_err(|e| build_error("mint account", e))?;

    let metadata = TokenMetadata {
        mint: *mint,
        name: request.name.trim().to_string(),
        symbol: request.symbol.trim().to_string(),
        uri: request.metadata_uri.trim().to_string(),
        ..Default::default()
    };
    let metadata_space = metadata
        .tlv_size_of()
        .map_err(|e| build_error("token metadata", e))?;

    Ok(MintAccountSizes {
        mint_space,
        metadata_space,
    })
}

/// Plan the create-token workflow. `rent_lamports` must cover
/// `sizes.rent_space()`.
pub fn build_create_token(
    request: &MintWorkflowRequest,
    owner: &Pubkey,
    mint_keypair: Keypair,
    sizes: MintAccountSizes,
    rent_lamports: u64,
) -> Result<WorkflowPlan, MintError> {
    request.validate()?;

    let token_program_id = spl_token_2022::id();
    let mint = mint_keypair.pubkey();
    let mut plan = WorkflowPlan::new(WorkflowKind::CreateToken, *owner, mint);

    let create_mint = vec![
        system_instruction::create_account(
            owner,
            &mint,
            rent_lamports,
            sizes.mint_space as u64,
            &token_program_id,
        ),
        metadata_pointer::instruction::initialize(
            &token_program_id,
            &mint,
            Some(*owner),
            Some(mint),
        )
        .map_err(|e| build_error("metadata pointer", e))?,
        token_instruction::initialize_mint(
            &token_program_id,
            &mint,
            owner,
            None,
            request.decimals,
        )
        .map_err(|e| build_error("initialize mint", e))?,
        metadata_instruction::initialize(
            &token_program_id,
            &mint,
            owner,
            &mint,
            owner,
            request.name.trim().to_string(),
            request.symbol.trim().to_string(),
            request.metadata_uri.trim().to_string(),
        ),
    ];
    plan.steps
        .push(TransactionStep::new(StepName::CreateMint, create_mint).signed_by_mint());

    let associated_account = associated_token_address(owner, &mint);
    plan.steps.push(TransactionStep::new(
        StepName::CreateAssociatedAccount,
        vec![create_associated_token_account(
            owner,
            owner,
            &mint,
            &token_program_id,
        )],
    ));

    if request.grant_mint_authority_to_creator {
        let amount = to_base_units(request.initial_supply, request.decimals)?;
        plan.steps.push(TransactionStep::new(
            StepName::MintSupply,
            vec![mint_to(&mint, &associated_account, owner, amount)?],
        ));
    }

    plan.mint_signer = Some(mint_keypair);
    Ok(plan)
}

/// Plan the mint-more workflow from the mint as read from the chain.
/// Only Token-2022 mints whose authority is `owner` are accepted.
pub fn build_mint_more(
    request: &MintMoreRequest,
    owner: &Pubkey,
    mint_info: &MintInfo,
    associated_account_exists: bool,
) -> Result<WorkflowPlan, MintError> {
    request.validate()?;

    if !mint_info.is_token_2022() {
        return Err(MintError::Validation(format!(
            "{} is owned by {}, only Token-2022 mints are supported",
            request.mint, mint_info.program_id
        )));
    }
    if mint_info.mint_authority != Some(*owner) {
        return Err(MintError::Authorization(format!(
            "{} is not the mint authority of {}",
            owner, request.mint
        )));
    }

    let mut plan = WorkflowPlan::new(WorkflowKind::MintMore, *owner, request.mint);
    let associated_account = associated_token_address(owner, &request.mint);

    if !associated_account_exists {
        plan.steps.push(TransactionStep::new(
            StepName::CreateAssociatedAccount,
            vec![create_associated_token_account(
                owner,
                owner,
                &request.mint,
                &spl_token_2022::id(),
            )],
        ));
    }

    let amount = to_base_units(request.amount, mint_info.decimals)?;
    plan.steps.push(TransactionStep::new(
        StepName::MintSupply,
        vec![mint_to(&request.mint, &associated_account, owner, amount)?],
    ));

    Ok(plan)
}

fn mint_to(
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction, MintError> {
    token_instruction::mint_to(
        &spl_token_2022::id(),
        mint,
        destination,
        authority,
        &[],
        amount,
    )
    .map_err(|e| build_error("mint to", e))
}
