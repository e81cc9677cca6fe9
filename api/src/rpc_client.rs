//! JSON-RPC transport used for every call to the warehouse backend.
//!
//! The backend speaks the JSON-RPC 2.0 dialect used by the web client:
//! every request is a `POST` of `{"jsonrpc":"2.0","method":"call","params":…,"id":n}`
//! and every response is either `{"result": …}` or `{"error": {…}}`.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use serde_json::json;
use serde_json::Value;

use crate::config::ClientConfig;

/// A failed remote call.
///
/// Callers show both kinds to the user the same way, but log them apart.
#[derive(Debug, Clone, PartialEq, thiserror::Error, strum::EnumIs)]
pub enum RemoteError {
    /// The request never completed, or completed with a non-success status.
    #[error(
        "network error ({}): {message}",
        .status.map_or_else(|| "no response".to_string(), |s| format!("HTTP {s}"))
    )]
    Network {
        status: Option<u16>,
        message: String,
    },

    /// The backend answered, but the answer encodes an application error.
    #[error("remote error: {message}")]
    Protocol { code: Option<i64>, message: String },
}

impl RemoteError {
    pub(crate) fn unexpected_payload(what: &str, err: impl std::fmt::Display) -> Self {
        Self::Protocol {
            code: None,
            message: format!("unexpected {what} payload: {err}"),
        }
    }
}

/// Anything that can perform a named remote operation.
///
/// `operation` is the endpoint path, `params` the JSON-RPC `params` object.
pub trait RemoteDataClient {
    async fn call(&self, operation: &str, params: Value) -> Result<Value, RemoteError>;
}

/// `reqwest`-backed [`RemoteDataClient`].
#[derive(Debug)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    base_url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, operation: &str) -> String {
        format!("{}{}", self.base_url, operation)
    }
}

impl RemoteDataClient for JsonRpcClient {
    async fn call(&self, operation: &str, params: Value) -> Result<Value, RemoteError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = json!({
            "jsonrpc": "2.0",
            "method": "call",
            "params": params,
            "id": id,
        });

        let response = self
            .http
            .post(self.url_for(operation))
            .header(CACHE_CONTROL, "no-cache")
            .json(&envelope)
            .send()
            .await
            .map_err(|e| RemoteError::Network {
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Network {
                status: Some(status.as_u16()),
                message: format!("HTTP error! status: {status}"),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RemoteError::unexpected_payload("response", e))?;

        decode_envelope(body)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

#[derive(Deserialize)]
struct ErrorObject {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ErrorData>,
}

#[derive(Deserialize)]
struct ErrorData {
    #[serde(default)]
    message: Option<String>,
}

/// Unwraps a JSON-RPC response body into its `result`.
///
/// An absent or `null` result decodes to `Value::Null`; callers decide what
/// an empty answer means for them.
pub fn decode_envelope(body: Value) -> Result<Value, RemoteError> {
    let envelope: Envelope =
        serde_json::from_value(body).map_err(|e| RemoteError::unexpected_payload("envelope", e))?;

    if let Some(error) = envelope.error {
        let message = error
            .data
            .and_then(|d| d.message)
            .or(error.message)
            .unwrap_or_else(|| "unknown remote error".to_string());
        return Err(RemoteError::Protocol {
            code: error.code,
            message,
        });
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}
