//! JSON-RPC client for the Electrum wallet daemon.
//!
//! Implements [`WalletRpc`](super::WalletRpc) over HTTP using `reqwest`, with
//! basic auth and configurable timeouts.

mod client;
mod protocol;

pub use client::HttpRpcClient;
