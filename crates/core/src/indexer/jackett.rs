//! Jackett indexer backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::JackettConfig;

use super::{Category, Indexer, IndexerError, RawResult};

/// Jackett indexer backend, querying the aggregate `all` indexer.
pub struct JackettIndexer {
    client: Client,
    config: JackettConfig,
}

impl JackettIndexer {
    /// Create a new JackettIndexer with the given configuration.
    pub fn new(config: JackettConfig) -> Result<Self, IndexerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| IndexerError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Build the Jackett API URL for a query.
    fn build_query_url(&self, categories: &[Category], text: &str) -> String {
        let mut url = format!(
            "{}/api/v2.0/indexers/all/results?apikey={}&Query={}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.api_key),
            urlencoding::encode(text)
        );

        for cat in categories {
            url.push_str(&format!("&Category[]={}", category_to_jackett_id(*cat)));
        }

        url
    }
}

#[async_trait]
impl Indexer for JackettIndexer {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn query(
        &self,
        categories: &[Category],
        text: &str,
    ) -> Result<Vec<RawResult>, IndexerError> {
        let url = self.build_query_url(categories, text);
        debug!(query = text, ?categories, "Querying Jackett");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                IndexerError::Timeout
            } else if e.is_connect() {
                IndexerError::ConnectionFailed(e.to_string())
            } else {
                IndexerError::ApiError(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IndexerError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let jackett_response: JackettResponse = response
            .json()
            .await
            .map_err(|e| IndexerError::ApiError(format!("Failed to parse response: {}", e)))?;

        let results: Vec<RawResult> = jackett_response
            .Results
            .into_iter()
            .filter_map(JackettResult::into_raw_result)
            .collect();

        debug!(query = text, results = results.len(), "Jackett query complete");

        Ok(results)
    }
}

/// Map our categories to Jackett (Torznab) category IDs.
fn category_to_jackett_id(cat: Category) -> u32 {
    match cat {
        Category::Movies => 2000,
        Category::Tv => 5000,
        Category::Anime => 5070,
    }
}

// Jackett API response types
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResponse {
    Results: Vec<JackettResult>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Title: String,
    MagnetUri: Option<String>,
    Link: Option<String>,
    Size: Option<i64>,
    Seeders: Option<i64>,
    TMDb: Option<i64>,
    #[serde(default)]
    Category: Vec<i64>,
}

impl JackettResult {
    /// Results without any fetch link are useless to the download client.
    fn into_raw_result(self) -> Option<RawResult> {
        let link = self
            .MagnetUri
            .filter(|m| !m.is_empty())
            .or(self.Link.filter(|l| !l.is_empty()))?;

        Some(RawResult {
            title: self.Title,
            link,
            size_bytes: self.Size.unwrap_or(0).max(0) as u64,
            seeders: self.Seeders.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
            catalog_id: self.TMDb.filter(|id| *id > 0).map(|id| id as u64),
            categories: self
                .Category
                .into_iter()
                .filter(|c| *c > 0)
                .map(|c| c as u32)
                .collect(),
        })
    }
}
