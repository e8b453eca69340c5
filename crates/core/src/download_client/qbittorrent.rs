//! qBittorrent download client implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::QBittorrentConfig;

use super::{magnet_info_hash, DownloadClient, DownloadClientError, SubmitStatus};

/// qBittorrent Web API client.
pub struct QBittorrentClient {
    client: Client,
    config: QBittorrentConfig,
    /// Set once logged in; the SID cookie itself lives in the cookie jar.
    session: Arc<RwLock<bool>>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(config: QBittorrentConfig) -> Result<Self, DownloadClientError> {
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
            session: Arc::new(RwLock::new(false)),
        })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    /// Login and store session cookie.
    async fn login(&self) -> Result<(), DownloadClientError> {
        let url = format!("{}/api/v2/auth/login", self.base_url());

        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(&url)
            .form(&params)
            .send()
            .await
            .map_err(DownloadClientError::from_reqwest)?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if body.contains("Ok.") {
            debug!("qBittorrent login successful");
            *self.session.write().await = true;
            Ok(())
        } else if body.contains("Fails.") || status == StatusCode::FORBIDDEN {
            Err(DownloadClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(DownloadClientError::AuthenticationFailed(format!(
                "Unexpected response: {}",
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    /// Ensure we have a valid session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), DownloadClientError> {
        if *self.session.read().await {
            return Ok(());
        }
        self.login().await
    }

    /// Send an authenticated request, re-authenticating once on 403.
    async fn execute<F>(&self, build: F) -> Result<(StatusCode, String), DownloadClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.ensure_authenticated().await?;

        let response = build(&self.client)
            .send()
            .await
            .map_err(DownloadClientError::from_reqwest)?;

        let response = if response.status() == StatusCode::FORBIDDEN {
            warn!("qBittorrent session expired, re-authenticating");
            *self.session.write().await = false;
            self.login().await?;

            build(&self.client)
                .send()
                .await
                .map_err(DownloadClientError::from_reqwest)?
        } else {
            response
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DownloadClientError::ApiError(e.to_string()))?;
        Ok((status, body))
    }

    /// Whether a torrent with this info hash is already in the client.
    async fn has_torrent(&self, hash: &str) -> Result<bool, DownloadClientError> {
        let url = format!(
            "{}/api/v2/torrents/info?hashes={}",
            self.base_url(),
            urlencoding::encode(hash)
        );
        let (status, body) = self.execute(|c| c.get(&url)).await?;
        if !status.is_success() {
            return Err(DownloadClientError::ApiError(format!("HTTP {}", status)));
        }

        let torrents: Vec<QBTorrentSummary> = serde_json::from_str(&body)
            .map_err(|e| DownloadClientError::ApiError(format!("Failed to parse response: {}", e)))?;
        Ok(torrents.iter().any(|t| t.hash.eq_ignore_ascii_case(hash)))
    }
}

/// Subset of the qBittorrent torrent info response.
#[derive(Debug, Deserialize)]
struct QBTorrentSummary {
    hash: String,
}

#[async_trait]
impl DownloadClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn submit(&self, link: &str) -> Result<SubmitStatus, DownloadClientError> {
        // /torrents/add answers "Fails." both for duplicates and bad links,
        // so duplicates are detected up front when the hash is known.
        if let Some(hash) = magnet_info_hash(link) {
            if self.has_torrent(&hash).await? {
                debug!(hash = %hash, "Torrent already in qBittorrent");
                return Ok(SubmitStatus::AlreadyPresent);
            }
        }

        let url = format!("{}/api/v2/torrents/add", self.base_url());
        let (status, body) = self
            .execute(|c| c.post(&url).form(&[("urls", link)]))
            .await?;

        interpret_add_response(status, &body)
    }
}

/// Map the /torrents/add response to a submission result.
fn interpret_add_response(status: StatusCode, body: &str) -> Result<SubmitStatus, DownloadClientError> {
    if status == StatusCode::CONFLICT {
        // qBittorrent 5.1+ reports an existing torrent with 409
        return Ok(SubmitStatus::AlreadyPresent);
    }
    if !status.is_success() {
        return Err(DownloadClientError::ApiError(format!("HTTP {}", status)));
    }
    if body.trim() == "Fails." {
        return Err(DownloadClientError::Rejected(
            "qBittorrent refused the link".to_string(),
        ));
    }
    Ok(SubmitStatus::Accepted)
}
