use async_trait::async_trait;
use reqwest::{header, Url};
use tracing::{debug, trace};

use crate::config::RpcConfig;
use crate::error::{CoreError, RpcError};

use super::super::WalletRpc;
use super::protocol::{extract_result, JsonRpcRequest, REQUEST_ID};

/// Electrum daemon JSON-RPC client over HTTP.
///
/// Every call is an independent POST; the only shared state is the
/// immutable configuration and `reqwest`'s internal connection handling.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: Url,
    config: RpcConfig,
}

impl HttpRpcClient {
    /// Validate `config` and build the underlying HTTP client.
    pub fn new(config: RpcConfig) -> Result<Self, CoreError> {
        let url = config.endpoint()?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::Config(format!("build HTTP client: {e}")))?;

        debug!(endpoint = %config.redacted_endpoint(), "rpc client configured");

        Ok(Self {
            client,
            url,
            config,
        })
    }
}

#[async_trait]
impl WalletRpc for HttpRpcClient {
    async fn invoke(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        debug!(
            rpc.method = method,
            rpc.params = params.as_object().map_or(0, |p| p.len()),
            "rpc call"
        );
        let req = JsonRpcRequest {
            id: REQUEST_ID,
            method,
            params: &params,
        };

        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(&self.config.user, Some(self.config.expose_password()))
            .json(&req)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.method = method, body = %body, "rpc response body");

        extract_result(status, &body)
    }
}
