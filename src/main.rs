//! onlymint - command line entry point
//!
//! Creates Token-2022 mints with on-chain metadata, mints more supply of
//! tokens the wallet controls and shows the wallet's balances.
use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use log::info;
use onlymint::solana::wallet::Approval;
use onlymint::{Cli, ServiceContainer, Settings};

/// Application entry point
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    info!("Starting onlymint v{}", onlymint::VERSION);

    // Settings are checked before any workflow starts
    let settings = Settings::load().context("Failed to load configuration")?;

    let approval = if cli.yes {
        Approval::Automatic
    } else {
        Approval::Terminal
    };
    let container = ServiceContainer::new(&settings, approval)
        .context("Failed to initialize services")?;
    info!("Using wallet {}", container.owner());

    let mut reconciler = container.reconciler();
    let succeeded = cli
        .command
        .execute(&container, &settings.metadata_uri, &mut reconciler)
        .await?;

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}
