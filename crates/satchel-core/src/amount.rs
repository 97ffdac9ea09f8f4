//! Unit conversion and amount parsing.
//!
//! The public API speaks `f64` base units (whole coins). Values read off the
//! wire are parsed into `bitcoin::Amount` / `bitcoin::SignedAmount` so sums
//! are exact in subunits before they are reported back as `f64`.

use bitcoin::{Amount, Denomination, SignedAmount};
use serde_json::Value;

use crate::error::RpcError;

/// Subunits (satoshis) per base unit.
pub const SUBUNITS_PER_UNIT: f64 = 100_000_000.0;

/// Convert a base-unit amount to subunits.
pub fn to_subunits(amount: f64) -> f64 {
    amount * SUBUNITS_PER_UNIT
}

/// Convert a subunit amount to base units.
pub fn to_base_units(subunits: f64) -> f64 {
    subunits / SUBUNITS_PER_UNIT
}

/// Parse a non-negative amount from a JSON number or decimal string.
///
/// Numbers are rounded to the nearest subunit, since the daemon serialises
/// floats and `0.1 + 0.2` style artifacts are common. Strings go through
/// `from_str_in`, which rejects more than 8 decimals.
pub(crate) fn parse_amount(value: &Value, field: &str) -> Result<Amount, RpcError> {
    match value {
        Value::Number(_) => {
            let sats = float_to_subunits(value, field)?;
            let sats = u64::try_from(sats).map_err(|_| invalid_amount(field, value))?;
            Ok(Amount::from_sat(sats))
        }
        Value::String(s) => Amount::from_str_in(s.trim(), Denomination::Bitcoin)
            .map_err(|e| invalid_amount_with(field, value, e)),
        _ => Err(invalid_amount(field, value)),
    }
}

/// Like [`parse_amount`], but allows negative values (unconfirmed balances
/// go negative while an outgoing payment is pending).
pub(crate) fn parse_signed_amount(value: &Value, field: &str) -> Result<SignedAmount, RpcError> {
    match value {
        Value::Number(_) => Ok(SignedAmount::from_sat(float_to_subunits(value, field)?)),
        Value::String(s) => SignedAmount::from_str_in(s.trim(), Denomination::Bitcoin)
            .map_err(|e| invalid_amount_with(field, value, e)),
        _ => Err(invalid_amount(field, value)),
    }
}

/// Parse a plain number that the daemon may send either bare or quoted.
pub(crate) fn parse_number(value: &Value, field: &str) -> Result<f64, RpcError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| n.is_finite())
        .ok_or_else(|| RpcError::InvalidResponse(format!("expected numeric {field}, got: {value}")))
}

/// Round a JSON number of base units to whole subunits.
fn float_to_subunits(value: &Value, field: &str) -> Result<i64, RpcError> {
    let sats = value
        .as_f64()
        .map(|n| to_subunits(n).round())
        .filter(|s| s.is_finite() && s.abs() < i64::MAX as f64)
        .ok_or_else(|| invalid_amount(field, value))?;
    Ok(sats as i64)
}

fn invalid_amount(field: &str, value: &Value) -> RpcError {
    RpcError::InvalidResponse(format!("expected amount for {field}, got: {value}"))
}

fn invalid_amount_with(field: &str, value: &Value, err: impl std::fmt::Display) -> RpcError {
    RpcError::InvalidResponse(format!("invalid amount for {field} `{value}`: {err}"))
}
