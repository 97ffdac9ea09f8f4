pub mod amount;
pub mod config;
pub mod error;
mod history;
pub mod rpc;
pub mod types;
pub mod wallet;

pub use config::RpcConfig;
pub use error::{CoreError, Rejection, RpcError};
pub use types::{BlockHeight, HistoryScan};
pub use wallet::WalletRpcClient;
