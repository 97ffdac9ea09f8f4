//! Typed wallet operations on top of the [`WalletRpc`] call primitive.

use std::sync::Arc;

use bitcoin::SignedAmount;
use serde_json::{json, Value};
use tracing::debug;

use crate::amount::{self, parse_number, parse_signed_amount};
use crate::config::RpcConfig;
use crate::error::{CoreError, Rejection, RpcError};
use crate::history;
use crate::rpc::{HttpRpcClient, WalletRpc};
use crate::types::{BlockHeight, HistoryScan};

/// Fee priority used when the caller has no preference.
pub const DEFAULT_FEE_LEVEL: f64 = 0.5;

pub const DEFAULT_MIN_CONFIRMATIONS: u32 = 1;

pub const DEFAULT_FROM_HEIGHT: BlockHeight = BlockHeight(1);

/// Manual fees at or above this many base units are refused. Catches a fee
/// passed in subunits by mistake.
pub const MAX_MANUAL_FEE: f64 = 0.01;

/// `payto` amount that tells the daemon to sweep every available coin.
pub const SWEEP_AMOUNT: &str = "!";

/// Client for an Electrum wallet daemon.
///
/// Holds nothing but the RPC backend, so it is cheap to clone and safe to
/// share between tasks. Ordering between concurrent wallet-mutating calls is
/// up to the daemon.
#[derive(Clone)]
pub struct WalletRpcClient {
    rpc: Arc<dyn WalletRpc>,
}

impl WalletRpcClient {
    /// Connect over HTTP using `config`.
    pub fn connect(config: RpcConfig) -> Result<Self, CoreError> {
        Ok(Self::from_rpc(Arc::new(HttpRpcClient::new(config)?)))
    }

    /// Drive the typed operations through any [`WalletRpc`] backend.
    pub fn from_rpc(rpc: Arc<dyn WalletRpc>) -> Self {
        Self { rpc }
    }

    /// Raw call: send `method` with the `params` object and return `result`.
    pub async fn invoke(&self, method: &str, params: Value) -> Result<Value, CoreError> {
        Ok(self.rpc.invoke(method, params).await?)
    }

    pub fn to_subunits(amount: f64) -> f64 {
        amount::to_subunits(amount)
    }

    pub fn to_base_units(subunits: f64) -> f64 {
        amount::to_base_units(subunits)
    }

    /// Broadcast a hex-encoded transaction and return its txid.
    pub async fn broadcast(&self, tx_hex: &str) -> Result<String, CoreError> {
        let result = self.invoke("broadcast", json!({ "tx": tx_hex })).await?;
        Ok(expect_string(result, "broadcast")?)
    }

    /// Generate a new receiving address.
    pub async fn create_new_address(&self) -> Result<String, CoreError> {
        let result = self.invoke("createnewaddress", json!({})).await?;
        Ok(expect_string(result, "createnewaddress")?)
    }

    /// Wallet balance in base units. Unconfirmed funds (which may be
    /// negative) are included unless `confirmed_only` is set.
    pub async fn get_balance(&self, confirmed_only: bool) -> Result<f64, CoreError> {
        let result = self.invoke("getbalance", json!({})).await?;
        let balance = match result {
            Value::Object(balance) => balance,
            other => {
                return Err(RpcError::InvalidResponse(format!(
                    "expected object from getbalance, got: {other}"
                ))
                .into())
            }
        };

        let mut total = SignedAmount::ZERO;
        if let Some(confirmed) = balance.get("confirmed") {
            total = add_balance(total, parse_signed_amount(confirmed, "confirmed")?)?;
        }
        if !confirmed_only {
            if let Some(unconfirmed) = balance.get("unconfirmed") {
                total = add_balance(total, parse_signed_amount(unconfirmed, "unconfirmed")?)?;
            }
        }

        Ok(total.to_btc())
    }

    /// Recommended fee rate per byte for `fee_level` in `[0.0, 1.0]`.
    pub async fn get_fee_rate(&self, fee_level: f64) -> Result<f64, CoreError> {
        if !(0.0..=1.0).contains(&fee_level) {
            return Err(CoreError::InvalidArgument(format!(
                "fee_level must be between 0.0 and 1.0, got {fee_level}"
            )));
        }

        let result = self
            .invoke("getfeerate", json!({ "fee_level": fee_level }))
            .await?;
        // The daemon quotes per kilobyte.
        Ok(parse_number(&result, "fee rate")? / 1000.0)
    }

    pub async fn is_mine(&self, address: &str) -> Result<bool, CoreError> {
        let result = self.invoke("ismine", json!({ "address": address })).await?;
        Ok(expect_bool(result, "ismine")?)
    }

    pub async fn validate_address(&self, address: &str) -> Result<bool, CoreError> {
        let result = self
            .invoke("validateaddress", json!({ "address": address }))
            .await?;
        Ok(expect_bool(result, "validateaddress")?)
    }

    /// Total received per wallet-owned address, scanning history from
    /// `from_height` and stopping at the first transaction with fewer than
    /// `min_confirmations`. See [`HistoryScan`] for resuming.
    pub async fn history(
        &self,
        min_confirmations: u32,
        from_height: BlockHeight,
    ) -> Result<HistoryScan, CoreError> {
        let result = self
            .invoke(
                "history",
                json!({
                    "show_addresses": true,
                    "show_fiat": true,
                    "show_fees": true,
                    "from_height": from_height,
                }),
            )
            .await?;
        let transactions = history::decode(result)?;
        history::scan(self, transactions, min_confirmations, from_height).await
    }

    /// Build and sign a payment of `amount` base units. `amount_fee` of 0.0
    /// lets the daemon pick a dynamic fee. Returns the signed transaction hex,
    /// ready for [`broadcast`](Self::broadcast).
    pub async fn pay_to(
        &self,
        destination: &str,
        amount: f64,
        amount_fee: f64,
    ) -> Result<String, CoreError> {
        if !(amount.is_finite() && amount > 0.0) {
            debug!(amount, "payment rejected: invalid amount");
            return Err(Rejection::InvalidAmount { amount }.into());
        }
        check_manual_fee(amount_fee)?;

        self.payto(payment_params(destination, json!(amount), amount_fee))
            .await
    }

    /// Like [`pay_to`](Self::pay_to), but sweeps all available funds.
    pub async fn pay_to_max(
        &self,
        destination: &str,
        amount_fee: f64,
    ) -> Result<String, CoreError> {
        check_manual_fee(amount_fee)?;

        self.payto(payment_params(destination, json!(SWEEP_AMOUNT), amount_fee))
            .await
    }

    async fn payto(&self, params: Value) -> Result<String, CoreError> {
        let result = self.invoke("payto", params).await?;
        let hex = result
            .get("hex")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                RpcError::InvalidResponse(format!("payto result has no `hex` string: {result}"))
            })?;
        Ok(hex)
    }
}

fn check_manual_fee(fee: f64) -> Result<(), Rejection> {
    // Written so NaN fails too.
    if fee < MAX_MANUAL_FEE {
        Ok(())
    } else {
        debug!(fee, limit = MAX_MANUAL_FEE, "payment rejected: manual fee too high");
        Err(Rejection::FeeTooHigh {
            fee,
            limit: MAX_MANUAL_FEE,
        })
    }
}

fn payment_params(destination: &str, amount: Value, fee: f64) -> Value {
    let mut params = json!({
        "destination": destination,
        "amount": amount,
    });
    if fee > 0.0 {
        params["fee"] = json!(fee);
    }
    params
}

fn add_balance(total: SignedAmount, part: SignedAmount) -> Result<SignedAmount, RpcError> {
    total
        .checked_add(part)
        .ok_or_else(|| RpcError::InvalidResponse("balance overflows".to_owned()))
}

fn expect_string(result: Value, method: &str) -> Result<String, RpcError> {
    match result {
        Value::String(s) => Ok(s),
        other => Err(RpcError::InvalidResponse(format!(
            "expected string from {method}, got: {other}"
        ))),
    }
}

fn expect_bool(result: Value, method: &str) -> Result<bool, RpcError> {
    result.as_bool().ok_or_else(|| {
        RpcError::InvalidResponse(format!("expected boolean from {method}, got: {result}"))
    })
}
