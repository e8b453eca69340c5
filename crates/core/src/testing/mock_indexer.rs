//! Mock indexer for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::indexer::{Category, Indexer, IndexerError, RawResult};

/// A recorded query for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    /// The query text.
    pub text: String,
    /// The categories the query was scoped to.
    pub categories: Vec<Category>,
    /// When the query was made (tokio clock, so paused tests see virtual time).
    pub at: Instant,
}

/// A query handler that produces results dynamically based on the query.
type QueryHandler = Box<dyn Fn(&str) -> Option<Vec<RawResult>> + Send + Sync>;

/// Mock implementation of the Indexer trait.
///
/// Results are keyed by exact query text; unknown queries return an empty
/// list. A query handler, if set, is consulted first.
///
/// # Example
///
/// ```rust,ignore
/// use seafarer_core::testing::{MockIndexer, fixtures};
///
/// let indexer = MockIndexer::new();
/// indexer
///     .add_results("Dune 2021 1080p", vec![fixtures::raw_result("Dune.2021.1080p", 8, 200)])
///     .await;
///
/// let results = indexer.query(&[Category::Movies], "Dune 2021 1080p").await?;
/// assert_eq!(results.len(), 1);
/// assert_eq!(indexer.recorded_queries().await[0].text, "Dune 2021 1080p");
/// ```
pub struct MockIndexer {
    /// Configured results by query text.
    results: Arc<RwLock<HashMap<String, Vec<RawResult>>>>,
    /// Queries that always fail.
    failures: Arc<RwLock<HashMap<String, IndexerError>>>,
    /// If set, the next query will fail with this error.
    next_error: Arc<RwLock<Option<IndexerError>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    query_handler: Arc<RwLock<Option<QueryHandler>>>,
}

impl std::fmt::Debug for MockIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockIndexer")
            .field("results", &"<results>")
            .field("failures", &"<failures>")
            .field("queries", &"<queries>")
            .field("query_handler", &"<handler>")
            .finish()
    }
}

impl Default for MockIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIndexer {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            queries: Arc::new(RwLock::new(Vec::new())),
            query_handler: Arc::new(RwLock::new(None)),
        }
    }

    /// Return these results for this exact query text.
    pub async fn add_results(&self, query: &str, results: Vec<RawResult>) {
        self.results
            .write()
            .await
            .entry(query.to_string())
            .or_default()
            .extend(results);
    }

    /// Make every query with this text fail.
    pub async fn fail_query(&self, query: &str, error: IndexerError) {
        self.failures.write().await.insert(query.to_string(), error);
    }

    /// Configure the next query to fail with the given error.
    pub async fn set_next_error(&self, error: IndexerError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set a handler that produces results from the query text.
    ///
    /// Returning `None` falls back to the configured results.
    pub async fn set_query_handler<F>(&self, handler: F)
    where
        F: Fn(&str) -> Option<Vec<RawResult>> + Send + Sync + 'static,
    {
        *self.query_handler.write().await = Some(Box::new(handler));
    }

    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Recorded query texts, in order.
    pub async fn query_texts(&self) -> Vec<String> {
        self.queries
            .read()
            .await
            .iter()
            .map(|q| q.text.clone())
            .collect()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn query(
        &self,
        categories: &[Category],
        text: &str,
    ) -> Result<Vec<RawResult>, IndexerError> {
        self.queries.write().await.push(RecordedQuery {
            text: text.to_string(),
            categories: categories.to_vec(),
            at: Instant::now(),
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(err) = self.failures.read().await.get(text) {
            return Err(err.clone());
        }

        if let Some(ref handler) = *self.query_handler.read().await {
            if let Some(results) = handler(text) {
                return Ok(results);
            }
        }

        Ok(self
            .results
            .read()
            .await
            .get(text)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_results_by_exact_query() {
        let indexer = MockIndexer::new();
        indexer
            .add_results("dune", vec![fixtures::raw_result("Dune.2021", 8, 10)])
            .await;

        assert_eq!(indexer.query(&[], "dune").await.unwrap().len(), 1);
        assert!(indexer.query(&[], "dune 2021").await.unwrap().is_empty());
        assert_eq!(indexer.query_texts().await, vec!["dune", "dune 2021"]);
    }

    #[tokio::test]
    async fn test_error_injection() {
        let indexer = MockIndexer::new();
        indexer.set_next_error(IndexerError::Timeout).await;
        indexer
            .fail_query("broken", IndexerError::ApiError("HTTP 500".to_string()))
            .await;

        assert!(indexer.query(&[], "x").await.is_err());
        // Next error is consumed
        assert!(indexer.query(&[], "x").await.is_ok());
        assert!(indexer.query(&[], "broken").await.is_err());
        assert!(indexer.query(&[], "broken").await.is_err());
        assert_eq!(indexer.query_count().await, 4);
    }

    #[tokio::test]
    async fn test_query_handler() {
        let indexer = MockIndexer::new();
        indexer
            .set_query_handler(|q| {
                q.contains("S01E")
                    .then(|| vec![fixtures::raw_result(&format!("Show {}", q), 1, 5)])
            })
            .await;

        assert_eq!(indexer.query(&[], "Show S01E02").await.unwrap().len(), 1);
        assert!(indexer.query(&[], "Show S01").await.unwrap().is_empty());
    }
}
