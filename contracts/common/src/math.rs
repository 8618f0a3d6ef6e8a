//! Mathematical Utilities for the poolBTC Allocation Core
//!
//! Safe arithmetic and share/asset conversion with explicit rounding
//! direction. All amounts are `u64` base units; products widen to
//! `u128` before dividing.

use crate::errors::{PoolBtcError, PoolBtcResult};

/// Rounding direction for share/asset conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero
    Down,
    /// Round away from zero on any remainder
    Up,
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> PoolBtcResult<u64> {
    a.checked_add(b).ok_or(PoolBtcError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u64, b: u64) -> PoolBtcResult<u64> {
    a.checked_sub(b).ok_or(PoolBtcError::Underflow)
}

/// Compute `a * b / denominator` with the given rounding direction
pub fn mul_div(a: u64, b: u64, denominator: u64, rounding: Rounding) -> PoolBtcResult<u64> {
    if denominator == 0 {
        return Err(PoolBtcError::DivisionByZero);
    }

    let product = (a as u128) * (b as u128);
    let quotient = product / denominator as u128;

    let result = match rounding {
        Rounding::Down => quotient,
        Rounding::Up => {
            if product % denominator as u128 == 0 {
                quotient
            } else {
                quotient + 1
            }
        }
    };

    if result > u64::MAX as u128 {
        return Err(PoolBtcError::Overflow);
    }
    Ok(result as u64)
}

/// Convert an asset amount into destination shares at the current
/// exchange rate. An empty destination (no shares or no assets) quotes
/// 1:1 for the first depositor.
pub fn assets_to_shares(
    assets: u64,
    total_shares: u64,
    total_assets: u64,
    rounding: Rounding,
) -> PoolBtcResult<u64> {
    if total_shares == 0 || total_assets == 0 {
        return Ok(assets);
    }
    mul_div(assets, total_shares, total_assets, rounding)
}

/// Convert destination shares into an asset amount at the current
/// exchange rate. An empty destination quotes 1:1.
pub fn shares_to_assets(
    shares: u64,
    total_shares: u64,
    total_assets: u64,
    rounding: Rounding,
) -> PoolBtcResult<u64> {
    if total_shares == 0 || total_assets == 0 {
        return Ok(shares);
    }
    mul_div(shares, total_assets, total_shares, rounding)
}
