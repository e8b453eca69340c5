//! Deluge download client implementation (Web UI JSON-RPC).

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::DelugeConfig;

use super::{DownloadClient, DownloadClientError, SubmitStatus};

/// Deluge error code for an expired or missing web session.
const NOT_AUTHENTICATED: i64 = 1;

/// Deluge Web UI client.
pub struct DelugeClient {
    client: Client,
    config: DelugeConfig,
    session: RwLock<bool>,
    next_id: AtomicU64,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Clone, Deserialize)]
struct RpcError {
    message: String,
    #[serde(default)]
    code: i64,
}

impl DelugeClient {
    /// Create a new Deluge client.
    pub fn new(config: DelugeConfig) -> Result<Self, DownloadClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| {
                DownloadClientError::Internal(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            session: RwLock::new(false),
            next_id: AtomicU64::new(1),
        })
    }

    fn rpc_url(&self) -> String {
        format!("{}/json", self.config.url.trim_end_matches('/'))
    }

    /// Issue one JSON-RPC call without any session handling.
    async fn call(&self, method: &str, params: Value) -> Result<RpcResponse, DownloadClientError> {
        let request = RpcRequest {
            method,
            params,
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
        };

        let response = self
            .client
            .post(self.rpc_url())
            .json(&request)
            .send()
            .await
            .map_err(DownloadClientError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(DownloadClientError::ApiError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DownloadClientError::ApiError(format!("Failed to parse response: {}", e)))
    }

    /// Log in and make sure the web UI is connected to a daemon.
    async fn login(&self) -> Result<(), DownloadClientError> {
        let response = self
            .call("auth.login", json!([self.config.password]))
            .await?;
        if response.result != Value::Bool(true) {
            return Err(DownloadClientError::AuthenticationFailed(
                "Invalid password".to_string(),
            ));
        }

        let connected = self.call("web.connected", json!([])).await?;
        if connected.result != Value::Bool(true) {
            let hosts = self.call("web.get_hosts", json!([])).await?;
            let host_id = hosts
                .result
                .get(0)
                .and_then(|host| host.get(0))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DownloadClientError::ConnectionFailed("No Deluge daemon configured".to_string())
                })?
                .to_string();
            debug!(host_id = %host_id, "Connecting Deluge web UI to daemon");
            self.call("web.connect", json!([host_id])).await?;
        }

        debug!("Deluge login successful");
        *self.session.write().await = true;
        Ok(())
    }

    /// Call a method on an authenticated session, logging in again once if
    /// the session has expired.
    async fn authed_call(&self, method: &str, params: Value) -> Result<RpcResponse, DownloadClientError> {
        if !*self.session.read().await {
            self.login().await?;
        }

        let response = self.call(method, params.clone()).await?;
        match &response.error {
            Some(err) if err.code == NOT_AUTHENTICATED => {
                warn!("Deluge session expired, re-authenticating");
                *self.session.write().await = false;
                self.login().await?;
                self.call(method, params).await
            }
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl DownloadClient for DelugeClient {
    fn name(&self) -> &str {
        "deluge"
    }

    async fn submit(&self, link: &str) -> Result<SubmitStatus, DownloadClientError> {
        let method = if link.starts_with("magnet:") {
            "core.add_torrent_magnet"
        } else {
            "core.add_torrent_url"
        };

        let response = self.authed_call(method, json!([link, {}])).await?;
        interpret_add_response(response)
    }
}

fn interpret_add_response(response: RpcResponse) -> Result<SubmitStatus, DownloadClientError> {
    if let Some(err) = response.error {
        if err.message.to_lowercase().contains("already") {
            return Ok(SubmitStatus::AlreadyPresent);
        }
        return Err(DownloadClientError::Rejected(err.message));
    }
    if response.result.is_null() {
        return Err(DownloadClientError::Rejected(
            "Deluge returned no torrent id".to_string(),
        ));
    }
    Ok(SubmitStatus::Accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RpcResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_add_response_accepted() {
        let response = parse(r#"{"result": "2f1a5c", "error": null, "id": 3}"#);
        assert_eq!(interpret_add_response(response).unwrap(), SubmitStatus::Accepted);
    }

    #[test]
    fn test_add_response_already_in_session() {
        let response = parse(
            r#"{"result": null, "error": {"message": "Torrent already in session (2f1a5c).", "code": 4}, "id": 3}"#,
        );
        assert_eq!(
            interpret_add_response(response).unwrap(),
            SubmitStatus::AlreadyPresent
        );
    }

    #[test]
    fn test_add_response_rejected() {
        let response = parse(
            r#"{"result": null, "error": {"message": "Invalid magnet info", "code": 4}, "id": 3}"#,
        );
        let result = interpret_add_response(response);
        assert!(matches!(result, Err(DownloadClientError::Rejected(msg)) if msg.contains("Invalid")));
    }

    #[test]
    fn test_add_response_null_result() {
        let response = parse(r#"{"result": null, "error": null, "id": 3}"#);
        assert!(interpret_add_response(response).is_err());
    }

    #[test]
    fn test_rpc_request_shape() {
        let request = RpcRequest {
            method: "auth.login",
            params: json!(["deluge"]),
            id: 1,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["method"], "auth.login");
        assert_eq!(value["params"][0], "deluge");
        assert_eq!(value["id"], 1);
    }
}
