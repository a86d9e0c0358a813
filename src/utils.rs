use alloy::primitives::U256;
use lazy_static::lazy_static;
use regex::Regex;

use crate::entity::PresaleError;

lazy_static! {
    static ref AMOUNT_RE: Regex = Regex::new(r"^([0-9]*)(?:\.([0-9]*))?$").unwrap();
}

/// Number of fractional digits kept when rendering balances.
const DISPLAY_FRACTION_DIGITS: usize = 2;

// Parse a user-typed decimal string into minimal units for the given precision
pub fn parse_amount(text: &str, decimals: u8) -> Result<U256, PresaleError> {
    let text = text.trim();

    let caps = AMOUNT_RE
        .captures(text)
        .ok_or_else(|| PresaleError::InvalidAmount(format!("'{}' is not a number", text)))?;

    let integer = caps.get(1).map_or("", |m| m.as_str());
    let fraction = caps.get(2).map_or("", |m| m.as_str());

    if integer.is_empty() && fraction.is_empty() {
        return Err(PresaleError::InvalidAmount("amount is empty".to_string()));
    }

    let decimals = decimals as usize;
    if fraction.len() > decimals {
        return Err(PresaleError::InvalidAmount(format!(
            "at most {} fractional digits allowed",
            decimals
        )));
    }

    let mut digits = String::with_capacity(integer.len() + decimals);
    digits.push_str(integer);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));

    U256::from_str_radix(&digits, 10)
        .map_err(|_| PresaleError::InvalidAmount("amount is too large".to_string()))
}

// Format a minimal-unit balance for display, truncated to two fractional digits
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return String::new();
    }

    let base = U256::from(10u8).pow(U256::from(decimals));
    let (whole, remainder) = amount.div_rem(base);

    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        return whole.to_string();
    }

    let kept: String = fraction.chars().take(DISPLAY_FRACTION_DIGITS).collect();
    format!("{}.{:0<width$}", whole, kept, width = DISPLAY_FRACTION_DIGITS)
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 {
        return address.to_string();
    }

    let start = &address[..6];
    let end = &address[address.len() - 4..];

    format!("{}...{}", start, end)
}
