// Re-export submodules
pub mod builder;
pub mod constants;

// Re-export commonly used items
pub use builder::{
    associated_token_address, build_create_token, build_mint_more, mint_account_sizes,
    MintAccountSizes,
};
pub use constants::{DEFAULT_METADATA_URI, TOKEN_DECIMALS};
