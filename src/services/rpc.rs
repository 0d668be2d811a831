use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use solana_client::rpc_request::RpcRequest;
use std::time::Duration;
use thiserror::Error;

pub const RPC_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("RPC HTTP error: {0}")]
    Http(u16),
    /// JSON-RPC `error` object, message kept verbatim.
    #[error("{0}")]
    Rpc(String),
    #[error("RPC request timed out after {0:?}")]
    Timeout(Duration),
    #[error("RPC transport error: {0}")]
    Transport(reqwest::Error),
    #[error("Malformed RPC response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Minimal JSON-RPC 2.0 client for a single ledger endpoint.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: Client,
    url: String,
    timeout: Duration,
}

impl RpcClient {
    pub fn new(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            timeout: RPC_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and returns its `result` member (`null` when absent).
    pub async fn call(&self, request: RpcRequest, params: Value) -> Result<Value, RpcError> {
        tracing::debug!("RPC {} -> {}", request, self.url);
        let payload = request.build_request_json(1, params);

        // reqwest enforces the deadline on its own; the outer timer also covers body reads.
        match tokio::time::timeout(self.timeout, self.send(&payload)).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout(self.timeout)),
        }
    }

    async fn send(&self, payload: &Value) -> Result<Value, RpcError> {
        let resp = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RpcError::Http(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let envelope: RpcEnvelope =
            serde_json::from_slice(&body).map_err(|e| RpcError::Decode(e.to_string()))?;

        if let Some(error) = envelope.error {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("RPC error");
            return Err(RpcError::Rpc(message.to_string()));
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }

    fn transport_error(&self, e: reqwest::Error) -> RpcError {
        if e.is_timeout() {
            RpcError::Timeout(self.timeout)
        } else {
            RpcError::Transport(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_is_jsonrpc_2() {
        let body = RpcRequest::GetTokenLargestAccounts
            .build_request_json(1, json!(["Mint1111", {"commitment": "confirmed"}]));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["method"], "getTokenLargestAccounts");
        assert_eq!(body["params"][0], "Mint1111");
    }

    #[test]
    fn error_messages_match_transport_contract() {
        assert_eq!(RpcError::Http(503).to_string(), "RPC HTTP error: 503");
        assert_eq!(
            RpcError::Rpc("Invalid param: could not find mint".into()).to_string(),
            "Invalid param: could not find mint"
        );
    }

    #[test]
    fn envelope_treats_null_error_as_absent() {
        let envelope: RpcEnvelope =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": 5, "error": null}))
                .unwrap();
        assert!(envelope.error.is_none());
        assert_eq!(envelope.result, Some(json!(5)));
    }
}
