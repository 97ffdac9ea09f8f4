/// Failures while talking to the wallet daemon.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request never produced a readable response (connection refused,
    /// DNS failure, timeout, truncated body).
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The daemon answered, but not with something we understand.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The daemon answered with a JSON-RPC `error` object.
    #[error("daemon error {code}: {message}")]
    ServerError { code: i64, message: String },
}

/// Payments refused before any request reaches the daemon.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("payment amount must be positive and finite, got {amount}")]
    InvalidAmount { amount: f64 },

    #[error("manual fee {fee} must be below {limit}")]
    FeeTooHigh { fee: f64, limit: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("payment rejected locally: {0}")]
    Rejected(#[from] Rejection),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CoreError {
    /// True when the daemon could not be reached or the exchange was cut short.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Rpc(RpcError::Transport(_)))
    }

    /// True when the daemon replied with a malformed or error envelope.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::Rpc(RpcError::InvalidResponse(_) | RpcError::ServerError { .. })
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_protocol_errors() {
        let err = CoreError::from(RpcError::InvalidResponse("no result".into()));
        assert!(err.is_protocol());
        assert!(!err.is_transport());

        let err = CoreError::from(RpcError::ServerError {
            code: -32601,
            message: "method not found".into(),
        });
        assert!(err.is_protocol());
    }

    #[test]
    fn local_rejections_are_neither_transport_nor_protocol() {
        let err = CoreError::from(Rejection::InvalidAmount { amount: 0.0 });
        assert!(!err.is_protocol());
        assert!(!err.is_transport());
        assert_eq!(
            err.to_string(),
            "payment rejected locally: payment amount must be positive and finite, got 0"
        );
    }
}
