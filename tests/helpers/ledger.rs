use async_trait::async_trait;
use onlymint::entity::MintError;
use onlymint::solana::indexer::{AssetMetadata, IndexerProvider, MintInfo, TokenAccountRecord};
use onlymint::solana::connection::expired;
use onlymint::solana::{ChainConnection, ConfirmationStatus, LatestBlockhash};
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    system_program, transaction::Transaction,
};
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_token_2022::instruction::TokenInstruction;
use spl_token_metadata_interface::instruction::TokenMetadataInstruction;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct FakeMint {
    pub program_id: Pubkey,
    pub initialized: bool,
    pub mint_authority: Option<Pubkey>,
    pub decimals: u8,
    pub supply: u64,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct FakeTokenAccount {
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, Default)]
struct Accounts {
    lamports: HashMap<Pubkey, u64>,
    mints: HashMap<Pubkey, FakeMint>,
    token_accounts: HashMap<Pubkey, FakeTokenAccount>,
}

#[derive(Debug, Default)]
struct LedgerState {
    accounts: Accounts,
    statuses: HashMap<Signature, Result<(), String>>,
    received: Vec<Signature>,
    // 1-based number of the transaction that fails on chain
    fail_transaction: Option<usize>,
    stall_confirmations: bool,
    drop_transactions: bool,
    fail_metadata: bool,
    block_height: u64,
}

/// In-memory chain and indexer. Executes the system, Token-2022, token
/// metadata and associated token account instructions the workflows send.
#[derive(Debug, Default)]
pub struct FakeLedger {
    state: Mutex<LedgerState>,
}

impl FakeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap()
    }

    pub fn fund(&self, address: &Pubkey, lamports: u64) {
        *self.state().accounts.lamports.entry(*address).or_default() += lamports;
    }

    /// An initialized Token-2022 mint created outside the workflows.
    pub fn add_mint(&self, mint_authority: Option<Pubkey>, name: &str, symbol: &str) -> Pubkey {
        self.add_mint_of(spl_token_2022::id(), mint_authority, name, symbol)
    }

    /// An initialized mint of the legacy SPL Token program.
    pub fn add_legacy_mint(
        &self,
        mint_authority: Option<Pubkey>,
        name: &str,
        symbol: &str,
    ) -> Pubkey {
        self.add_mint_of(spl_token::id(), mint_authority, name, symbol)
    }

    fn add_mint_of(
        &self,
        program_id: Pubkey,
        mint_authority: Option<Pubkey>,
        name: &str,
        symbol: &str,
    ) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.state().accounts.mints.insert(
            mint,
            FakeMint {
                program_id,
                initialized: true,
                mint_authority,
                decimals: 9,
                supply: 0,
                name: name.to_string(),
                symbol: symbol.to_string(),
            },
        );
        mint
    }

    pub fn add_token_account(&self, owner: &Pubkey, mint: &Pubkey, amount: u64) -> Pubkey {
        let address = self.associated_account(owner, mint);
        self.state().accounts.token_accounts.insert(
            address,
            FakeTokenAccount {
                owner: *owner,
                mint: *mint,
                amount,
            },
        );
        address
    }

    pub fn fail_transaction(&self, number: usize) {
        self.state().fail_transaction = Some(number);
    }

    pub fn stall_confirmations(&self) {
        self.state().stall_confirmations = true;
    }

    /// Accepted transactions never land; their blockhash expires instead.
    pub fn drop_transactions(&self) {
        self.state().drop_transactions = true;
    }

    pub fn fail_metadata(&self) {
        self.state().fail_metadata = true;
    }

    /// Number of transactions submitted so far
    pub fn transactions(&self) -> usize {
        self.state().received.len()
    }

    pub fn mint(&self, mint: &Pubkey) -> Option<FakeMint> {
        self.state().accounts.mints.get(mint).cloned()
    }

    pub fn token_balance(&self, owner: &Pubkey, mint: &Pubkey) -> Option<u64> {
        let address = self.associated_account(owner, mint);
        self.state()
            .accounts
            .token_accounts
            .get(&address)
            .map(|account| account.amount)
    }
}

impl FakeLedger {
    // derived for the program that owns the mint
    fn associated_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        let program_id = self
            .mint(mint)
            .map(|mint| mint.program_id)
            .unwrap_or_else(spl_token_2022::id);
        get_associated_token_address_with_program_id(owner, mint, &program_id)
    }
}

fn execute(accounts: &mut Accounts, transaction: &Transaction) -> Result<(), String> {
    let message = &transaction.message;
    let keys = &message.account_keys;

    for instruction in &message.instructions {
        let program_id = keys[instruction.program_id_index as usize];
        let metas: Vec<(Pubkey, bool)> = instruction
            .accounts
            .iter()
            .map(|index| (keys[*index as usize], message.is_signer(*index as usize)))
            .collect();

        if program_id == system_program::id() {
            create_account(accounts, &metas, &instruction.data)?;
        } else if program_id == spl_token_2022::id() {
            token_instruction(accounts, &metas, &instruction.data)?;
        } else if program_id == spl_associated_token_account::id() {
            create_associated_account(accounts, &metas)?;
        } else {
            return Err(format!("unknown program {}", program_id));
        }
    }
    Ok(())
}

fn create_account(
    accounts: &mut Accounts,
    metas: &[(Pubkey, bool)],
    data: &[u8],
) -> Result<(), String> {
    // SystemInstruction::CreateAccount: u32 tag, u64 lamports, u64 space, owner
    if data.len() < 52 || data[..4] != [0, 0, 0, 0] {
        return Err("unsupported system instruction".to_string());
    }
    let lamports = u64::from_le_bytes(data[4..12].try_into().unwrap());
    let program_id = Pubkey::new_from_array(data[20..52].try_into().unwrap());
    let (payer, new_account) = (metas[0], metas[1]);
    if !payer.1 || !new_account.1 {
        return Err("create_account needs payer and account signatures".to_string());
    }
    if accounts.mints.contains_key(&new_account.0) {
        return Err("account already in use".to_string());
    }

    let balance = accounts.lamports.entry(payer.0).or_default();
    if *balance < lamports {
        return Err("insufficient lamports".to_string());
    }
    *balance -= lamports;
    accounts.mints.insert(
        new_account.0,
        FakeMint {
            program_id,
            ..FakeMint::default()
        },
    );
    Ok(())
}

fn token_instruction(
    accounts: &mut Accounts,
    metas: &[(Pubkey, bool)],
    data: &[u8],
) -> Result<(), String> {
    if let Ok(TokenMetadataInstruction::Initialize(init)) = TokenMetadataInstruction::unpack(data)
    {
        let (mint_key, mint_authority) = (metas[2].0, metas[3]);
        let mint = accounts
            .mints
            .get_mut(&mint_key)
            .filter(|mint| mint.initialized)
            .ok_or("metadata for unknown mint")?;
        if mint.mint_authority != Some(mint_authority.0) || !mint_authority.1 {
            return Err("metadata needs the mint authority signature".to_string());
        }
        mint.name = init.name;
        mint.symbol = init.symbol;
        return Ok(());
    }

    match TokenInstruction::unpack(data).map_err(|e| e.to_string())? {
        TokenInstruction::MetadataPointerExtension => Ok(()),
        TokenInstruction::InitializeMint {
            decimals,
            mint_authority,
            ..
        } => {
            let mint = accounts
                .mints
                .get_mut(&metas[0].0)
                .ok_or("mint account does not exist")?;
            if mint.initialized {
                return Err("mint already initialized".to_string());
            }
            mint.initialized = true;
            mint.decimals = decimals;
            mint.mint_authority = Some(mint_authority);
            Ok(())
        }
        TokenInstruction::MintTo { amount } => {
            let (mint_key, destination, authority) = (metas[0].0, metas[1].0, metas[2]);
            let mint = accounts
                .mints
                .get_mut(&mint_key)
                .ok_or("mint account does not exist")?;
            if mint.mint_authority != Some(authority.0) || !authority.1 {
                return Err("owner does not match".to_string());
            }
            let account = accounts
                .token_accounts
                .get_mut(&destination)
                .filter(|account| account.mint == mint_key)
                .ok_or("invalid destination account")?;
            mint.supply = mint.supply.checked_add(amount).ok_or("overflow")?;
            account.amount += amount;
            Ok(())
        }
        other => Err(format!("unsupported token instruction {:?}", other)),
    }
}

fn create_associated_account(
    accounts: &mut Accounts,
    metas: &[(Pubkey, bool)],
) -> Result<(), String> {
    let (address, wallet, mint, token_program) = (metas[1].0, metas[2].0, metas[3].0, metas[5].0);
    if address != get_associated_token_address_with_program_id(&wallet, &mint, &token_program) {
        return Err("invalid associated account address".to_string());
    }
    if !accounts
        .mints
        .get(&mint)
        .is_some_and(|mint| mint.initialized && mint.program_id == token_program)
    {
        return Err("mint is not initialized".to_string());
    }
    if accounts.token_accounts.contains_key(&address) {
        return Err("associated account already exists".to_string());
    }
    accounts.token_accounts.insert(
        address,
        FakeTokenAccount {
            owner: wallet,
            mint,
            amount: 0,
        },
    );
    Ok(())
}

#[async_trait]
impl ChainConnection for FakeLedger {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64, MintError> {
        Ok(self
            .state()
            .accounts
            .lamports
            .get(address)
            .copied()
            .unwrap_or_default())
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, MintError> {
        Ok(LatestBlockhash {
            blockhash: Hash::new_unique(),
            last_valid_block_height: self.state().block_height + 150,
        })
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        space: usize,
    ) -> Result<u64, MintError> {
        Ok((space as u64 + 128) * 6_960)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool, MintError> {
        let state = self.state();
        Ok(state.accounts.mints.contains_key(address)
            || state.accounts.token_accounts.contains_key(address))
    }

    async fn send_transaction(&self, transaction: &Transaction) -> Result<Signature, MintError> {
        transaction
            .verify()
            .map_err(|e| MintError::Rpc(format!("signature verification failed: {}", e)))?;

        let mut state = self.state();
        let signature = transaction.signatures[0];
        state.received.push(signature);
        if state.drop_transactions {
            return Ok(signature);
        }

        let status = if state.fail_transaction == Some(state.received.len()) {
            Err("custom program error: 0x1".to_string())
        } else {
            let mut accounts = state.accounts.clone();
            execute(&mut accounts, transaction).map(|()| state.accounts = accounts)
        };
        state.statuses.insert(signature, status);
        Ok(signature)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        _commitment: CommitmentConfig,
        last_valid_block_height: u64,
    ) -> Result<ConfirmationStatus, MintError> {
        let stalled = self.state().stall_confirmations;
        if stalled {
            std::future::pending::<()>().await;
        }

        // one block per poll
        loop {
            tokio::task::yield_now().await;
            let mut state = self.state();
            match state.statuses.get(signature) {
                Some(Ok(())) => return Ok(ConfirmationStatus::Confirmed),
                Some(Err(reason)) => return Ok(ConfirmationStatus::Failed(reason.clone())),
                None if state.block_height > last_valid_block_height => {
                    return Ok(expired(last_valid_block_height))
                }
                None => state.block_height += 1,
            }
        }
    }
}

#[async_trait]
impl IndexerProvider for FakeLedger {
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<TokenAccountRecord>, MintError> {
        let state = self.state();
        let mut records: Vec<TokenAccountRecord> = state
            .accounts
            .token_accounts
            .iter()
            .filter(|(_, account)| account.owner == *owner)
            .filter_map(|(address, account)| {
                let mint = state
                    .accounts
                    .mints
                    .get(&account.mint)
                    .filter(|mint| mint.program_id == *program_id)?;
                Some(TokenAccountRecord {
                    address: *address,
                    mint: account.mint,
                    raw_amount: account.amount,
                    decimals: mint.decimals,
                })
            })
            .collect();
        records.sort_by_key(|record| record.address);
        Ok(records)
    }

    async fn get_mint_info(&self, mint: &Pubkey) -> Result<Option<MintInfo>, MintError> {
        Ok(self
            .state()
            .accounts
            .mints
            .get(mint)
            .filter(|mint| mint.initialized)
            .map(|mint| MintInfo {
                program_id: mint.program_id,
                mint_authority: mint.mint_authority,
                decimals: mint.decimals,
                supply: mint.supply,
            }))
    }

    async fn get_asset(&self, mint: &Pubkey) -> Result<Option<AssetMetadata>, MintError> {
        let state = self.state();
        if state.fail_metadata {
            return Err(MintError::Rpc("Asset Not Found".to_string()));
        }
        Ok(state.accounts.mints.get(mint).map(|mint| AssetMetadata {
            name: mint.name.clone(),
            symbol: mint.symbol.clone(),
        }))
    }
}
