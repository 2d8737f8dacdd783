//! Decimal <-> base unit conversion for user-entered amounts.

use thiserror::Error;

/// Decimals of ETH (wei).
pub const ETH_DECIMALS: u32 = 18;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount: {0:?}")]
    Invalid(String),

    #[error("too many decimal places: {places} (max {max})")]
    TooPrecise { places: usize, max: u32 },

    #[error("amount overflows")]
    Overflow,
}

/// Parse an ether amount (`"0.01"`) into wei.
pub fn parse_ether(amount: &str) -> Result<u128, UnitsError> {
    parse_units(amount, ETH_DECIMALS)
}

/// Parse a non-negative decimal string into base units with `decimals` places.
pub fn parse_units(amount: &str, decimals: u32) -> Result<u128, UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(UnitsError::Invalid(amount.to_string()));
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UnitsError::Invalid(amount.to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooPrecise {
            places: frac.len(),
            max: decimals,
        });
    }

    let scale = 10u128.checked_pow(decimals).ok_or(UnitsError::Overflow)?;
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| UnitsError::Overflow)?
    };
    let frac_value: u128 = if frac.is_empty() {
        0
    } else {
        let padding = 10u128.pow(decimals - frac.len() as u32);
        frac.parse::<u128>().map_err(|_| UnitsError::Overflow)? * padding
    };

    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_value))
        .ok_or(UnitsError::Overflow)
}

/// Render base units as a decimal string, trimming trailing zeros.
pub fn format_units(value: u128, decimals: u32) -> String {
    // past 38 decimals the scale overflows u128 and every value is below one unit
    let (whole, frac) = match 10u128.checked_pow(decimals) {
        Some(scale) => (value / scale, value % scale),
        None => (0, value),
    };
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
