//! Connection parameters for the wallet daemon.

use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};

use crate::error::CoreError;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the daemon.
///
/// The password is kept in a [`SecretString`] so it stays out of `Debug`
/// output and logs; it is only exposed when a request is authenticated.
#[derive(Debug)]
pub struct RpcConfig {
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl RpcConfig {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: SecretString::new(password.into()),
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub(crate) fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Build and validate the endpoint URL. Credentials are not embedded;
    /// they travel as basic auth on each request.
    pub fn endpoint(&self) -> Result<Url, CoreError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(CoreError::Config("rpc host must not be empty".to_owned()));
        }
        if self.port == 0 {
            return Err(CoreError::Config("rpc port must be non-zero".to_owned()));
        }

        let host_part = bracket_ipv6(host);
        let raw = format!("http://{host_part}:{}/", self.port);
        let url = Url::parse(&raw).map_err(|e| {
            CoreError::Config(format!("invalid rpc host `{host}`: {e}"))
        })?;

        // A host containing a path, userinfo or another port would still
        // parse, just not into the URL we meant to build.
        if url.port_or_known_default() != Some(self.port) || url.path() != "/" {
            return Err(CoreError::Config(format!(
                "invalid rpc host `{host}`: expected a bare hostname or IP address"
            )));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(CoreError::Config(format!(
                "invalid rpc host `{host}`: credentials belong in rpc user/password"
            )));
        }

        Ok(url)
    }

    /// Endpoint rendering that is safe to log.
    pub fn redacted_endpoint(&self) -> String {
        format!(
            "http://{}:***@{}:{}/",
            self.user,
            bracket_ipv6(self.host.trim()),
            self.port
        )
    }
}

fn bracket_ipv6(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_owned()
    }
}
