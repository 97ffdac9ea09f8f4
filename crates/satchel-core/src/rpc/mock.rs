use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RpcError;

use super::WalletRpc;

/// A call the mock received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

/// A scripted wallet daemon for testing. Returns canned results per method
/// and records every call so tests can assert what went over the wire.
///
/// `ismine` is answered from the owned-address set unless a result was
/// scripted for it explicitly.
pub struct MockRpc {
    results: HashMap<String, Result<Value, (i64, String)>>,
    owned: HashSet<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockRpc {
    pub fn builder() -> MockRpcBuilder {
        MockRpcBuilder {
            results: HashMap::new(),
            owned: HashSet::new(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method)
            .collect()
    }
}

pub struct MockRpcBuilder {
    results: HashMap<String, Result<Value, (i64, String)>>,
    owned: HashSet<String>,
}

impl MockRpcBuilder {
    pub fn with_result(mut self, method: &str, result: Value) -> Self {
        self.results.insert(method.to_owned(), Ok(result));
        self
    }

    pub fn with_server_error(mut self, method: &str, code: i64, message: &str) -> Self {
        self.results
            .insert(method.to_owned(), Err((code, message.to_owned())));
        self
    }

    pub fn with_owned_address(mut self, address: &str) -> Self {
        self.owned.insert(address.to_owned());
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            results: self.results,
            owned: self.owned,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl WalletRpc for MockRpc {
    async fn invoke(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls
            .lock()
            .expect("mock call log poisoned")
            .push(RecordedCall {
                method: method.to_owned(),
                params: params.clone(),
            });

        match self.results.get(method) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err((code, message))) => Err(RpcError::ServerError {
                code: *code,
                message: message.clone(),
            }),
            None if method == "ismine" => {
                let address = params.get("address").and_then(Value::as_str).unwrap_or("");
                Ok(Value::Bool(self.owned.contains(address)))
            }
            None => Err(RpcError::ServerError {
                code: -32601,
                message: format!("method not found: {method}"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let rpc = MockRpc::builder()
            .with_result("createnewaddress", json!("bc1qnew"))
            .build();

        rpc.invoke("createnewaddress", json!({})).await.unwrap();
        rpc.invoke("ismine", json!({"address": "A"})).await.unwrap();

        let calls = rpc.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "createnewaddress");
        assert_eq!(calls[1].params, json!({"address": "A"}));
        assert_eq!(rpc.calls_to("ismine").len(), 1);
    }

    #[tokio::test]
    async fn ismine_answers_from_owned_set() {
        let rpc = MockRpc::builder().with_owned_address("A").build();
        assert_eq!(
            rpc.invoke("ismine", json!({"address": "A"})).await.unwrap(),
            json!(true)
        );
        assert_eq!(
            rpc.invoke("ismine", json!({"address": "B"})).await.unwrap(),
            json!(false)
        );
    }

    #[tokio::test]
    async fn unscripted_method_is_server_error() {
        let rpc = MockRpc::builder().build();
        let err = rpc.invoke("getbalance", json!({})).await.unwrap_err();
        assert!(matches!(err, RpcError::ServerError { code: -32601, .. }));
    }
}
