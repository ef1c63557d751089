use crate::di::ServiceContainer;
use crate::entity::{MintMoreRequest, MintWorkflowRequest};
use crate::presenter::{
    BalancePresenter, BalancePresenterImpl, Reconciler, TokenPresenter, TokenPresenterImpl,
};
use crate::utils::parse_solana_address;
use crate::view::{TerminalBalanceView, TerminalTokenView};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

#[derive(Parser, Debug, Clone)]
#[clap(
    author,
    version,
    about = "Create Token-2022 tokens with metadata and mint more of them"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,

    /// Sign every transaction without asking
    #[clap(global(true), short, long)]
    pub yes: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new token mint with on-chain metadata
    Create(CreateArgs),
    /// Mint more tokens of a mint you control
    Mint(MintArgs),
    /// Show SOL and token balances of the wallet
    Balance,
    /// List the tokens the wallet can mint
    Tokens,
}

#[derive(Clone, Debug, Args)]
pub struct CreateArgs {
    /// Token name
    #[clap(long)]
    pub name: String,

    /// Token symbol
    #[clap(long)]
    pub symbol: String,

    /// Whole tokens minted to the creator
    #[clap(long, default_value_t = 1)]
    pub supply: u64,

    /// Skip minting the initial supply
    #[clap(long)]
    pub no_mint_authority: bool,

    /// Metadata JSON URI. Defaults to the configured `metadata_uri`
    #[clap(long)]
    pub uri: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MintArgs {
    /// The address of the mint
    #[clap(long, value_parser = parse_solana_address)]
    pub mint: Pubkey,

    /// Whole tokens to mint
    #[clap(long)]
    pub amount: u64,
}

impl CreateArgs {
    pub fn into_request(self, default_metadata_uri: &str) -> MintWorkflowRequest {
        MintWorkflowRequest {
            metadata_uri: self
                .uri
                .unwrap_or_else(|| default_metadata_uri.to_string()),
            grant_mint_authority_to_creator: !self.no_mint_authority,
            ..MintWorkflowRequest::new(&self.name, &self.symbol, self.supply)
        }
    }
}

impl Command {
    /// Run the command. Returns `false` if a workflow ended in failure.
    pub async fn execute(
        self,
        container: &ServiceContainer,
        default_metadata_uri: &str,
        reconciler: &mut Reconciler,
    ) -> Result<bool> {
        let owner = container.owner();

        match self {
            Command::Create(args) => {
                let presenter = TokenPresenterImpl::new(
                    container.workflow_interactor(),
                    Arc::new(TerminalTokenView::new()),
                );
                let report = presenter
                    .create_token(args.into_request(default_metadata_uri), reconciler)
                    .await?;
                Ok(report.is_done())
            }
            Command::Mint(args) => {
                let presenter = TokenPresenterImpl::new(
                    container.workflow_interactor(),
                    Arc::new(TerminalTokenView::new()),
                );
                let request = MintMoreRequest {
                    mint: args.mint,
                    amount: args.amount,
                };
                let report = presenter.mint_more(request, reconciler).await?;
                Ok(report.is_done())
            }
            Command::Balance => {
                let presenter = BalancePresenterImpl::new(Arc::new(TerminalBalanceView::new()));
                presenter.show_balances(&owner, reconciler).await?;
                Ok(reconciler.state().snapshot.is_some())
            }
            Command::Tokens => {
                let presenter = BalancePresenterImpl::new(Arc::new(TerminalBalanceView::new()));
                presenter.show_mintable_tokens(&owner, reconciler).await?;
                Ok(reconciler.state().snapshot.is_some())
            }
        }
    }
}
