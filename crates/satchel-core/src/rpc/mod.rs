//! Wallet daemon RPC abstraction layer.
//!
//! Defines the [`WalletRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use http_adapter::HttpRpcClient;

use async_trait::async_trait;

use crate::error::RpcError;

/// The single call primitive every typed wallet operation is built on.
///
/// `params` is always a JSON object; implementations return the envelope's
/// `result` member and nothing else.
#[async_trait]
pub trait WalletRpc: Send + Sync {
    async fn invoke(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError>;
}
