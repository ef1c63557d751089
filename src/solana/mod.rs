// Re-export everything from submodules
pub mod client;
pub mod connection;
pub mod indexer;
pub mod tokens;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::create_solana_client;
pub use connection::{ChainConnection, ConfirmationStatus, LatestBlockhash, RpcChainConnection};
pub use indexer::{HeliusIndexer, IndexerProvider};
pub use utils::format_balance;
pub use wallet::{keypair_from_base58, keypair_from_json_file, KeypairWallet, WalletSigner};
