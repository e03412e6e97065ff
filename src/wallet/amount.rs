//! Amount conversion
//!
//! Decimal SUI strings to MIST and back. Conversion is done on the decimal
//! digits directly, never through floating point.

use crate::error::{WalletError, WalletResult};

/// Decimal places of the native coin
pub const SUI_DECIMALS: u8 = 9;

/// Base units per whole SUI
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Convert a decimal amount (`123` or `123.456`) to MIST
///
/// Only ASCII digits with at most one dot are accepted. Fractional digits
/// beyond nine are truncated.
pub fn to_base_units(amount: &str) -> WalletResult<u64> {
    let trimmed = amount.trim();
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(integer) || fraction.is_some_and(|f| !all_digits(f)) {
        return Err(WalletError::amount_format(format!("Invalid amount format: '{}'", amount)));
    }

    let width = SUI_DECIMALS as usize;
    let fraction = fraction.unwrap_or("");
    let mut fraction_digits: String = fraction.chars().take(width).collect();
    while fraction_digits.len() < width {
        fraction_digits.push('0');
    }

    let overflow = || WalletError::amount_format(format!("Amount too large: '{}'", amount));
    let whole: u64 = integer.parse().map_err(|_| overflow())?;
    let fractional: u64 = fraction_digits.parse().map_err(|_| overflow())?;

    whole
        .checked_mul(MIST_PER_SUI)
        .and_then(|v| v.checked_add(fractional))
        .ok_or_else(overflow)
}

/// Format a raw base-unit amount with four decimal places, rounding half up
///
/// Non-numeric input formats as zero, matching the balance fallback.
pub fn format_base_units(raw: &str, decimals: u8) -> String {
    const PLACES: u32 = 4;

    let value: u128 = raw.trim().parse().unwrap_or(0);
    let decimals = u32::from(decimals);

    let scaled = if decimals >= PLACES {
        let divisor = 10u128.pow(decimals - PLACES);
        (value + divisor / 2) / divisor
    } else {
        value.saturating_mul(10u128.pow(PLACES - decimals))
    };

    let unit = 10u128.pow(PLACES);
    format!("{}.{:04}", scaled / unit, scaled % unit)
}

/// Exact decimal rendering of MIST, trailing zeros trimmed
pub fn format_sui(mist: u64) -> String {
    let whole = mist / MIST_PER_SUI;
    let fractional = mist % MIST_PER_SUI;

    if fractional == 0 {
        whole.to_string()
    } else {
        let frac_str = format!("{:09}", fractional);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

/// `0x1234...cdef` style display form
pub fn shorten_address(address: &str, chars: usize) -> String {
    if address.is_empty() {
        return String::new();
    }
    let head_len = (chars + 2).min(address.len());
    let tail_start = address.len().saturating_sub(chars);
    match (address.get(..head_len), address.get(tail_start..)) {
        (Some(head), Some(tail)) => format!("{}...{}", head, tail),
        _ => address.to_string(),
    }
}
