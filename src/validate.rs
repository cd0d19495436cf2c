//! Input parsing shared by both plugins
//!
//! Every helper names the offending field so the caller can fix the request
//! without re-running anything.

use crate::{Error, Result};
use alloy::primitives::{Address, B256, U256};
use std::str::FromStr;

pub fn chain_id(field: &'static str, value: u64) -> Result<u64> {
    if value == 0 {
        return Err(Error::validation(field, "chain ID must be a positive integer"));
    }
    Ok(value)
}

pub fn address(field: &'static str, value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| Error::validation(field, format!("not a valid address ({})", e)))
}

pub fn optional_address(field: &'static str, value: Option<&str>) -> Result<Option<Address>> {
    value.map(|v| address(field, v)).transpose()
}

/// Parse a base-10 integer string into a `U256` (zero allowed)
pub fn uint(field: &'static str, value: &str) -> Result<U256> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(
            field,
            format!("'{}' is not a decimal integer", value),
        ));
    }
    U256::from_str_radix(value, 10)
        .map_err(|_| Error::validation(field, format!("'{}' does not fit in 256 bits", value)))
}

/// Parse a base-10 integer string that must be greater than zero
pub fn positive_amount(field: &'static str, value: &str) -> Result<U256> {
    let amount = uint(field, value)?;
    if amount.is_zero() {
        return Err(Error::validation(field, "must be a positive integer"));
    }
    Ok(amount)
}

/// Parse an `(assets, shares)` pair where exactly one side is non-zero
pub fn assets_or_shares(assets: &str, shares: Option<&str>) -> Result<(U256, U256)> {
    let assets = uint("assets", assets)?;
    let shares = shares.map(|s| uint("shares", s)).transpose()?.unwrap_or(U256::ZERO);

    match (assets.is_zero(), shares.is_zero()) {
        (false, true) | (true, false) => Ok((assets, shares)),
        (true, true) => Err(Error::validation(
            "assets",
            "one of assets or shares must be non-zero",
        )),
        (false, false) => Err(Error::validation(
            "shares",
            "shares must be 0 when assets is set",
        )),
    }
}

/// Parse a 32-byte market identifier (`0x` + 64 hex digits)
pub fn market_id(value: &str) -> Result<B256> {
    let value = value.trim();
    let hex = value.strip_prefix("0x").unwrap_or(value);
    if hex.len() != 64 {
        return Err(Error::validation(
            "market_id",
            format!("expected 32 bytes of hex, got {} characters", hex.len()),
        ));
    }
    B256::from_str(hex).map_err(|e| Error::validation("market_id", e.to_string()))
}

pub fn slippage_bps(value: Option<i64>) -> Result<Option<u16>> {
    match value {
        None => Ok(None),
        // 0x rejects slippage above 10000 bps (100%)
        Some(bps) if (0..=10_000).contains(&bps) => Ok(Some(bps as u16)),
        Some(bps) => Err(Error::validation(
            "slippage_bps",
            format!("{} is outside 0..=10000", bps),
        )),
    }
}
