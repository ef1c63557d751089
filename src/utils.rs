use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

// Parse a Solana address given on the command line
pub fn parse_solana_address(address: &str) -> Result<Pubkey, String> {
    Pubkey::from_str(address.trim()).map_err(|e| format!("Invalid Solana address: {}", e))
}

// Shorten an address to "abcdef...wxyz"
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
