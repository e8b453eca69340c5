//! Types for the indexer query system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content category used to scope an indexer query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movies,
    Tv,
    Anime,
}

/// One indexer hit. Read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawResult {
    /// Release title as published.
    pub title: String,
    /// Magnet URI or .torrent URL handed to the download client.
    pub link: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Seeders reported by the indexer.
    pub seeders: u32,
    /// External catalog id (TMDB) when the indexer knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<u64>,
    /// Raw indexer category codes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u32>,
}

/// Errors that can occur during indexer queries.
#[derive(Debug, Clone, Error)]
pub enum IndexerError {
    #[error("Indexer connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Indexer API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for torrent indexer backends.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Run a full-text query restricted to the given categories.
    async fn query(
        &self,
        categories: &[Category],
        text: &str,
    ) -> Result<Vec<RawResult>, IndexerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization() {
        assert_eq!(serde_json::to_string(&Category::Movies).unwrap(), "\"movies\"");
        assert_eq!(serde_json::to_string(&Category::Tv).unwrap(), "\"tv\"");
        assert_eq!(serde_json::to_string(&Category::Anime).unwrap(), "\"anime\"");
    }

    #[test]
    fn test_raw_result_minimal_json() {
        let json = r#"{
            "title": "Dune.2021.1080p",
            "link": "magnet:?xt=urn:btih:abc",
            "size_bytes": 1024,
            "seeders": 3
        }"#;
        let parsed: RawResult = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.title, "Dune.2021.1080p");
        assert!(parsed.catalog_id.is_none());
        assert!(parsed.categories.is_empty());

        let back = serde_json::to_string(&parsed).unwrap();
        assert!(!back.contains("catalog_id"));
    }
}
