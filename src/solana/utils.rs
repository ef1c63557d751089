use crate::entity::MintError;
use rust_decimal::{Decimal, RoundingStrategy};

// rust_decimal cannot represent more fractional digits than this
const MAX_DECIMAL_SCALE: u32 = 28;

// Balances below this are shown as "< 0.000001"
const DISPLAY_DECIMALS: u32 = 6;

/// Convert a whole-token amount into base units (`amount * 10^decimals`).
pub fn to_base_units(amount: u64, decimals: u8) -> Result<u64, MintError> {
    10u64
        .checked_pow(decimals as u32)
        .and_then(|factor| amount.checked_mul(factor))
        .ok_or_else(|| MintError::Validation(format!("Amount {} is too large", amount)))
}

/// Convert base units into an exact decimal amount (`raw / 10^decimals`).
pub fn from_base_units(raw: u64, decimals: u8) -> Decimal {
    let mut mantissa = raw as i128;
    let mut scale = decimals as u32;
    while scale > MAX_DECIMAL_SCALE {
        mantissa /= 10;
        scale -= 1;
    }
    Decimal::from_i128_with_scale(mantissa, scale)
}

/// Format a raw balance for display: six fractional digits at most, trailing
/// zeros stripped, tiny non-zero amounts collapsed to "< 0.000001".
pub fn format_balance(raw: u64, decimals: u8) -> String {
    let value = from_base_units(raw, decimals);
    if value.is_zero() {
        return "0".to_string();
    }
    if value < Decimal::new(1, DISPLAY_DECIMALS) {
        return "< 0.000001".to_string();
    }

    let rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.6}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
