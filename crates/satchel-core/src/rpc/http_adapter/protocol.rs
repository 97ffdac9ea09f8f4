use reqwest::StatusCode;
use serde_json::Value;

use crate::error::RpcError;

/// Electrum does not care about the id; this is what its own docs send.
pub(super) const REQUEST_ID: &str = "curltext";

const BODY_SNIPPET_LEN: usize = 256;

#[derive(serde::Serialize)]
pub(super) struct JsonRpcRequest<'a> {
    pub(super) id: &'static str,
    pub(super) method: &'a str,
    pub(super) params: &'a Value,
}

/// Pull `result` out of a response body.
///
/// A present, non-null `result` wins. Otherwise a non-null `error` becomes a
/// `ServerError`, an explicit `"result": null` is returned as-is, and a body
/// with neither is an `InvalidResponse`.
pub(super) fn extract_result(status: StatusCode, body: &str) -> Result<Value, RpcError> {
    let decoded: Value = serde_json::from_str(body).map_err(|e| {
        if status.is_success() {
            RpcError::InvalidResponse(format!(
                "decode JSON-RPC response: {e}; body={}",
                snippet(body)
            ))
        } else {
            RpcError::InvalidResponse(format!("HTTP {status}; body={}", snippet(body)))
        }
    })?;

    let Value::Object(mut envelope) = decoded else {
        return Err(RpcError::InvalidResponse(format!(
            "expected JSON-RPC object, got: {}",
            snippet(body)
        )));
    };

    match envelope.remove("result") {
        Some(result) if !result.is_null() => Ok(result),
        result => match envelope.remove("error") {
            Some(err) if !err.is_null() => Err(parse_jsonrpc_error(err)),
            _ => result.ok_or_else(|| {
                RpcError::InvalidResponse(format!(
                    "JSON-RPC response (HTTP {status}) has no `result`"
                ))
            }),
        },
    }
}

/// Parse a JSON-RPC error value into a structured `RpcError`.
///
/// `{"code": <int>, "message": <string>}` becomes a `ServerError`; anything
/// else falls back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: Value) -> RpcError {
    #[derive(serde::Deserialize)]
    struct JsonRpcError {
        code: i64,
        message: String,
    }

    match serde_json::from_value::<JsonRpcError>(err.clone()) {
        Ok(parsed) => RpcError::ServerError {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
