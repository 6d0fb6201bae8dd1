use alloy::primitives::{
    utils::{parse_units, ParseUnits},
    U256,
};

use crate::{Error, Result};

/// Bridged amounts are always scaled by 18 decimals, whatever the token was deployed with.
pub const BRIDGE_DECIMALS: u8 = 18;

/// `parse_units` truncates excess fractional digits, so the shape is checked first.
fn check_decimal_format(value: &str, decimals: u8, field: &str) -> Result<()> {
    if value.starts_with('-') {
        return Err(Error::InvalidRequest {
            message: format!("{field} must not be negative: {value}"),
        });
    }
    let (integer, fraction) = value.split_once('.').unwrap_or((value, ""));
    let well_formed = !(integer.is_empty() && fraction.is_empty())
        && integer.chars().all(|c| c.is_ascii_digit())
        && fraction.chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(Error::InvalidRequest {
            message: format!("{field} is not a decimal number: '{value}'"),
        });
    }
    if fraction.len() > decimals as usize {
        return Err(Error::InvalidRequest {
            message: format!("{field} '{value}' has more than {decimals} fractional digits"),
        });
    }
    Ok(())
}

fn parse_unsigned(value: &str, decimals: u8, field: &str) -> Result<U256> {
    let value = value.trim();
    check_decimal_format(value, decimals, field)?;
    match parse_units(value, decimals) {
        Ok(ParseUnits::U256(amount)) => Ok(amount),
        Ok(ParseUnits::I256(_)) => Err(Error::InvalidRequest {
            message: format!("{field} must not be negative: {value}"),
        }),
        Err(e) => Err(Error::InvalidRequest {
            message: format!("invalid {field} '{value}': {e}"),
        }),
    }
}

/// Initial supply as a raw integer; the requested decimals are not applied.
pub fn parse_initial_supply(value: &str) -> Result<U256> {
    parse_unsigned(value, 0, "initialTotalSupply")
}

pub fn parse_bridge_amount(value: &str) -> Result<U256> {
    parse_unsigned(value, BRIDGE_DECIMALS, "amount")
}
