//! Mock download client for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::download_client::{DownloadClient, DownloadClientError, SubmitStatus};

/// A recorded submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub link: String,
    pub timestamp: chrono::DateTime<Utc>,
}

/// Mock implementation of the DownloadClient trait.
///
/// Behaves like a real client's duplicate detection: the first submission
/// of a link is accepted, later ones report `AlreadyPresent`. Links marked
/// as rejected always fail. Every call is recorded, failed ones included.
#[derive(Debug)]
pub struct MockDownloadClient {
    submitted: Arc<RwLock<Vec<RecordedSubmission>>>,
    /// Links the client already holds.
    present: Arc<RwLock<HashSet<String>>>,
    /// Links the client refuses.
    rejected: Arc<RwLock<HashSet<String>>>,
    /// If set, the next submission will fail with this error.
    next_error: Arc<RwLock<Option<DownloadClientError>>>,
}

impl Default for MockDownloadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDownloadClient {
    pub fn new() -> Self {
        Self {
            submitted: Arc::new(RwLock::new(Vec::new())),
            present: Arc::new(RwLock::new(HashSet::new())),
            rejected: Arc::new(RwLock::new(HashSet::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Pretend the client already has this link.
    pub async fn mark_present(&self, link: &str) {
        self.present.write().await.insert(link.to_string());
    }

    /// Refuse this link on every submission.
    pub async fn reject_link(&self, link: &str) {
        self.rejected.write().await.insert(link.to_string());
    }

    /// Configure the next submission to fail with the given error.
    pub async fn set_next_error(&self, error: DownloadClientError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_submissions(&self) -> Vec<RecordedSubmission> {
        self.submitted.read().await.clone()
    }

    /// Submitted links in order, failed ones included.
    pub async fn submitted_links(&self) -> Vec<String> {
        self.submitted
            .read()
            .await
            .iter()
            .map(|s| s.link.clone())
            .collect()
    }

    /// Links the client accepted and now holds.
    pub async fn held_links(&self) -> HashSet<String> {
        self.present.read().await.clone()
    }
}

#[async_trait]
impl DownloadClient for MockDownloadClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn submit(&self, link: &str) -> Result<SubmitStatus, DownloadClientError> {
        self.submitted.write().await.push(RecordedSubmission {
            link: link.to_string(),
            timestamp: Utc::now(),
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if self.rejected.read().await.contains(link) {
            return Err(DownloadClientError::Rejected(format!("mock rejected {}", link)));
        }

        if self.present.write().await.insert(link.to_string()) {
            Ok(SubmitStatus::Accepted)
        } else {
            Ok(SubmitStatus::AlreadyPresent)
        }
    }
}
