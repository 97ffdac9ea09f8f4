//! Incoming-payment scan over the daemon's `history` result.
//!
//! The scan walks transactions in the order the daemon returns them (newest
//! first) and stops at the first one with too few confirmations. That early
//! exit is only correct if the daemon keeps confirmations monotone in its
//! output order; nothing here re-sorts or scans past it.

use std::collections::BTreeMap;

use bitcoin::Amount;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::amount::parse_amount;
use crate::error::{CoreError, RpcError};
use crate::types::{BlockHeight, HistoryScan};
use crate::wallet::WalletRpcClient;

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    /// Kept raw; each entry is only decoded once the scan reaches it.
    pub(crate) transactions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryTx {
    pub(crate) height: i64,
    pub(crate) confirmations: i64,
    #[serde(default)]
    pub(crate) outputs: Vec<HistoryOutput>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryOutput {
    pub(crate) address: Option<String>,
    pub(crate) value: Value,
}

/// `incoming` is compared against `true` exactly. Height 0 is mempool;
/// negative heights are unconfirmed with unconfirmed parents.
fn is_confirmed_incoming(entry: &Value) -> bool {
    if entry.get("incoming") != Some(&Value::Bool(true)) {
        return false;
    }
    !matches!(entry.get("height").and_then(Value::as_i64), Some(height) if height <= 0)
}

/// Decode a `history` result. Older daemons hand the document back as a
/// JSON-encoded string rather than an object.
pub(crate) fn decode(raw: Value) -> Result<Vec<Value>, RpcError> {
    let raw = match raw {
        Value::String(encoded) => serde_json::from_str(&encoded).map_err(|e| {
            RpcError::InvalidResponse(format!("decode string-encoded history: {e}"))
        })?,
        other => other,
    };

    let response: HistoryResponse = serde_json::from_value(raw)
        .map_err(|e| RpcError::InvalidResponse(format!("invalid history result: {e}")))?;
    Ok(response.transactions)
}

/// Sum values received by wallet-owned output addresses.
///
/// Ownership is checked with one `ismine` call per output, in order.
pub(crate) async fn scan(
    client: &WalletRpcClient,
    transactions: Vec<Value>,
    min_confirmations: u32,
    from_height: BlockHeight,
) -> Result<HistoryScan, CoreError> {
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
    let mut last_height = from_height;
    let mut accepted = 0usize;
    let total = transactions.len();

    for entry in transactions {
        if !is_confirmed_incoming(&entry) {
            continue;
        }
        let tx: HistoryTx = serde_json::from_value(entry)
            .map_err(|e| RpcError::InvalidResponse(format!("invalid history entry: {e}")))?;
        if tx.confirmations < i64::from(min_confirmations) {
            debug!(
                height = tx.height,
                confirmations = tx.confirmations,
                min_confirmations,
                "history scan stopped at under-confirmed transaction"
            );
            break;
        }

        for output in &tx.outputs {
            let Some(address) = output.address.as_deref() else {
                continue;
            };
            if !client.is_mine(address).await? {
                continue;
            }

            let value = parse_amount(&output.value, "history output value")?;
            let entry = totals.entry(address.to_owned()).or_insert(Amount::ZERO);
            *entry = entry.checked_add(value).ok_or_else(|| {
                RpcError::InvalidResponse(format!("received total overflows for {address}"))
            })?;
        }

        last_height = u32::try_from(tx.height).map(BlockHeight).map_err(|_| {
            RpcError::InvalidResponse(format!("history height out of range: {}", tx.height))
        })?;
        accepted += 1;
    }

    debug!(
        transactions = total,
        accepted,
        addresses = totals.len(),
        %last_height,
        "history scan complete"
    );

    Ok(HistoryScan {
        received: totals
            .into_iter()
            .map(|(address, amount)| (address, amount.to_btc()))
            .collect(),
        last_height,
    })
}
