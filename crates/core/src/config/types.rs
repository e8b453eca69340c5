use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub indexer: IndexerConfig,
    pub download_client: DownloadClientConfig,
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Indexer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
    /// Indexer backend type
    pub backend: IndexerBackend,
    /// Jackett-specific configuration (required when backend = "jackett")
    #[serde(default)]
    pub jackett: Option<JackettConfig>,
}

/// Available indexer backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IndexerBackend {
    Jackett,
}

/// Jackett indexer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Download client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadClientConfig {
    pub backend: DownloadClientBackend,
    #[serde(default)]
    pub qbittorrent: Option<QBittorrentConfig>,
    #[serde(default)]
    pub deluge: Option<DelugeConfig>,
}

/// Available download client backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DownloadClientBackend {
    #[serde(rename = "qbittorrent")]
    QBittorrent,
    Deluge,
}

/// qBittorrent Web API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QBittorrentConfig {
    /// Web UI URL (e.g., "http://localhost:8080")
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Deluge Web UI (JSON-RPC) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelugeConfig {
    /// Web UI URL (e.g., "http://localhost:8112")
    pub url: String,
    /// Web UI password (Deluge has no per-user login on the web API)
    pub password: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Acquisition engine tuning.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AcquisitionConfig {
    /// Minimum score a candidate needs to be considered (default: 0.5).
    #[serde(default = "default_min_score")]
    pub min_score: f32,
    /// Pause between consecutive per-episode indexer queries (default: 500).
    #[serde(default = "default_episode_delay_ms")]
    pub episode_delay_ms: u64,
    /// How many ranked candidates a tier may try before giving up (default: 3).
    #[serde(default = "default_max_submissions")]
    pub max_submissions_per_tier: usize,
    #[serde(default)]
    pub weights: ScoreWeights,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            episode_delay_ms: default_episode_delay_ms(),
            max_submissions_per_tier: default_max_submissions(),
            weights: ScoreWeights::default(),
        }
    }
}

fn default_min_score() -> f32 {
    0.5
}

fn default_episode_delay_ms() -> u64 {
    500
}

fn default_max_submissions() -> usize {
    3
}

/// Weights of the candidate score components.
///
/// `catalog_bonus` is added as-is when the catalog id matches; the other
/// four multiply their sub-score.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    pub title: f32,
    pub seeders: f32,
    pub quality: f32,
    pub size: f32,
    pub catalog_bonus: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            title: 0.35,
            seeders: 0.35,
            quality: 0.20,
            size: 0.10,
            catalog_bonus: 0.3,
        }
    }
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub indexer: SanitizedIndexerConfig,
    pub download_client: SanitizedDownloadClientConfig,
    pub acquisition: AcquisitionConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedIndexerConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDownloadClientConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub credentials_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let jackett = config.indexer.jackett.as_ref();
        let (client_url, credentials_configured) = match config.download_client.backend {
            DownloadClientBackend::QBittorrent => config
                .download_client
                .qbittorrent
                .as_ref()
                .map(|q| (Some(q.url.clone()), !q.password.is_empty()))
                .unwrap_or((None, false)),
            DownloadClientBackend::Deluge => config
                .download_client
                .deluge
                .as_ref()
                .map(|d| (Some(d.url.clone()), !d.password.is_empty()))
                .unwrap_or((None, false)),
        };

        Self {
            server: config.server.clone(),
            indexer: SanitizedIndexerConfig {
                backend: match config.indexer.backend {
                    IndexerBackend::Jackett => "jackett".to_string(),
                },
                url: jackett.map(|j| j.url.clone()),
                api_key_configured: jackett.map(|j| !j.api_key.is_empty()).unwrap_or(false),
            },
            download_client: SanitizedDownloadClientConfig {
                backend: match config.download_client.backend {
                    DownloadClientBackend::QBittorrent => "qbittorrent".to_string(),
                    DownloadClientBackend::Deluge => "deluge".to_string(),
                },
                url: client_url,
                credentials_configured,
            },
            acquisition: config.acquisition.clone(),
        }
    }
}
