//! Filtering and ordering of raw indexer responses.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::AcquisitionConfig;
use crate::indexer::RawResult;

use super::normalize::{matches_target, normalize_target_title};
use super::quality::Quality;
use super::scorer::{CandidateScorer, ScoreBreakdown};

/// A raw result that passed the title gate and the score threshold.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub result: RawResult,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

/// Gates, scores and orders raw results.
#[derive(Debug, Clone)]
pub struct ResultProcessor {
    scorer: CandidateScorer,
    min_score: f32,
}

impl Default for ResultProcessor {
    fn default() -> Self {
        Self::from_config(&AcquisitionConfig::default())
    }
}

impl ResultProcessor {
    pub fn new(scorer: CandidateScorer, min_score: f32) -> Self {
        Self { scorer, min_score }
    }

    pub fn from_config(config: &AcquisitionConfig) -> Self {
        Self::new(CandidateScorer::new(config.weights), config.min_score)
    }

    /// Keep results whose title starts with the target title and whose
    /// score reaches the threshold, largest first.
    ///
    /// Score only gates; among survivors the bigger release wins. Results of
    /// equal size keep their indexer order.
    pub fn process(
        &self,
        results: Vec<RawResult>,
        target_title: &str,
        target_catalog_id: Option<u64>,
        desired: Option<Quality>,
    ) -> Vec<ScoredCandidate> {
        let target = normalize_target_title(target_title);
        let total = results.len();

        let mut candidates: Vec<ScoredCandidate> = results
            .into_iter()
            .filter(|r| {
                let on_target = matches_target(&r.title, &target);
                if !on_target {
                    trace!(title = %r.title, target = %target, "Result does not match target title");
                }
                on_target
            })
            .filter_map(|result| {
                let breakdown = self.scorer.score(&result, target_catalog_id, desired);
                if breakdown.total < self.min_score {
                    trace!(title = %result.title, score = breakdown.total, "Result below minimum score");
                    return None;
                }
                Some(ScoredCandidate {
                    score: breakdown.total,
                    breakdown,
                    result,
                })
            })
            .collect();

        candidates.sort_by(|a, b| b.result.size_bytes.cmp(&a.result.size_bytes));

        debug!(
            target = %target,
            total,
            kept = candidates.len(),
            "Processed indexer results"
        );

        candidates
    }
}
