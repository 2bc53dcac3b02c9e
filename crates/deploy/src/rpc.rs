//! Minimal JSON-RPC plumbing over HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// Timeout applied to each individual HTTP request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A JSON-RPC endpoint plus the HTTP client used to reach it.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    http: reqwest::Client,
    endpoint: String,
}

impl JsonRpcClient {
    /// Create a client for `endpoint`.
    ///
    /// The endpoint is parsed up front so a malformed URL fails here rather
    /// than on the first call.
    pub fn new(endpoint: &str) -> Result<Self> {
        Url::parse(endpoint).with_context(|| format!("Invalid RPC endpoint URL: {endpoint}"))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// The endpoint URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Make a JSON-RPC call and deserialize the `result` field.
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> Result<T> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to send {method} request to {}", self.endpoint))?;

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {method} response"))?;

        if let Some(error) = body.get("error") {
            anyhow::bail!(
                "RPC error from {method}: {}",
                error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("unknown")
            );
        }

        let result = body
            .get("result")
            .with_context(|| format!("No result in {method} response"))?;

        serde_json::from_value(result.clone())
            .with_context(|| format!("Failed to deserialize {method} result"))
    }
}

/// Deserialize an optional `u64` from a 0x-prefixed hex quantity.
pub(crate) fn deserialize_opt_u64_from_hex<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = serde::Deserialize::deserialize(deserializer)?;
    value
        .map(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom))
        .transpose()
}
