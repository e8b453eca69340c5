//! Submission of chosen candidates to the download client.

use std::sync::Arc;

use tracing::{info, warn};

use crate::download_client::{DownloadClient, SubmitStatus};
use crate::matcher::ScoredCandidate;

use super::types::AcquisitionStats;

/// Hands candidates to the download client and folds its answer into
/// success or failure.
#[derive(Clone)]
pub struct SubmissionGateway {
    client: Arc<dyn DownloadClient>,
}

impl SubmissionGateway {
    pub fn new(client: Arc<dyn DownloadClient>) -> Self {
        Self { client }
    }

    /// Submit a candidate's link.
    ///
    /// Returns `None` when the client failed or rejected the link. A link
    /// the client already has counts as success.
    pub async fn submit(
        &self,
        candidate: &ScoredCandidate,
        stats: &mut AcquisitionStats,
    ) -> Option<SubmitStatus> {
        let result = self.client.submit(&candidate.result.link).await;
        let status = match result {
            Ok(status) => {
                info!(
                    client = self.client.name(),
                    title = %candidate.result.title,
                    score = candidate.score,
                    status = status.as_str(),
                    "Candidate submitted"
                );
                Some(status)
            }
            Err(e) => {
                warn!(
                    client = self.client.name(),
                    title = %candidate.result.title,
                    link = %candidate.result.link,
                    error = %e,
                    "Submission failed"
                );
                None
            }
        };
        stats.record_submission(status);
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{CandidateScorer, ResultProcessor};
    use crate::testing::{fixtures, MockDownloadClient};

    fn candidate(link: &str) -> ScoredCandidate {
        let mut result = fixtures::raw_result("Dune.2021.1080p.WEB-DL", 8, 300);
        result.link = link.to_string();
        ResultProcessor::new(CandidateScorer::default(), 0.0)
            .process(vec![result], "Dune", None, None)
            .remove(0)
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_success() {
        let client = Arc::new(MockDownloadClient::new());
        let gateway = SubmissionGateway::new(client.clone());
        let mut stats = AcquisitionStats::default();
        let c = candidate("magnet:?xt=urn:btih:dune");

        assert_eq!(gateway.submit(&c, &mut stats).await, Some(SubmitStatus::Accepted));
        assert_eq!(gateway.submit(&c, &mut stats).await, Some(SubmitStatus::AlreadyPresent));
        assert_eq!(stats.submissions_accepted, 1);
        assert_eq!(stats.submissions_duplicate, 1);
        assert_eq!(client.submitted_links().await.len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_link_is_failure() {
        let client = Arc::new(MockDownloadClient::new());
        client.reject_link("magnet:?xt=urn:btih:bad").await;
        let gateway = SubmissionGateway::new(client);
        let mut stats = AcquisitionStats::default();

        let status = gateway
            .submit(&candidate("magnet:?xt=urn:btih:bad"), &mut stats)
            .await;
        assert_eq!(status, None);
        assert_eq!(stats.submissions_failed, 1);
    }
}
