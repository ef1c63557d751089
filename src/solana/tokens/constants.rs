// Every mint created here uses nine decimals, like SOL
pub const TOKEN_DECIMALS: u8 = 9;

// Off-chain metadata document used when none is given
pub const DEFAULT_METADATA_URI: &str = "https://cdn.100xdevs.com/metadata.json";

pub const SOL_DECIMALS: u8 = 9;
