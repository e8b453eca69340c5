//! Candidate scoring.
//!
//! A candidate's score is the weighted sum of four sub-scores, each in
//! 0.0-1.0, plus a flat bonus when the indexer's catalog id matches the
//! requested one. The total is not normalized, so it can exceed 1.0.

use serde::Serialize;

use crate::config::ScoreWeights;
use crate::indexer::RawResult;

use super::normalize::normalize_result_title;
use super::quality::Quality;

/// Seeder count at which the health sub-score saturates.
const SEEDER_SATURATION: f32 = 500.0;

/// Per-component view of a score, for logs and API responses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub title: f32,
    pub seeders: f32,
    pub quality: f32,
    pub size: f32,
    /// Whether the catalog bonus was applied.
    pub catalog_match: bool,
    pub total: f32,
}

/// Scores raw results with a fixed set of weights.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer {
    weights: ScoreWeights,
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl CandidateScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a result against the target catalog id and desired quality.
    pub fn score(
        &self,
        result: &RawResult,
        target_catalog_id: Option<u64>,
        desired: Option<Quality>,
    ) -> ScoreBreakdown {
        let title = title_quality_score(&result.title);
        let seeders = seeder_score(result.seeders);
        let quality = quality_match_score(&result.title, desired);
        let size = size_fitness_score(result.size_bytes, desired);
        let catalog_match = catalog_matches(result.catalog_id, target_catalog_id);

        let mut total = title * self.weights.title
            + seeders * self.weights.seeders
            + quality * self.weights.quality
            + size * self.weights.size;
        if catalog_match {
            total += self.weights.catalog_bonus;
        }

        ScoreBreakdown {
            title,
            seeders,
            quality,
            size,
            catalog_match,
            total: total.max(0.0),
        }
    }
}

/// Release hygiene: samples, trailers and soundtracks are penalized.
pub fn title_quality_score(title: &str) -> f32 {
    let cleaned = normalize_result_title(title);
    let mut score = 1.0_f32;

    if cleaned.contains("sample") {
        score -= 0.3;
    }
    if cleaned.contains("trailer") {
        score -= 0.5;
    }
    // "ost" as a substring would hit "ghost", "host", "most"...
    if cleaned.contains("soundtrack") || cleaned.split(' ').any(|w| w == "ost") {
        score -= 0.8;
    }

    score.max(0.0)
}

pub fn seeder_score(seeders: u32) -> f32 {
    (seeders as f32 / SEEDER_SATURATION).min(1.0)
}

/// 1.0 for the exact desired tier, otherwise the table value of the best
/// tier the title names, 0.0 when it names none.
pub fn quality_match_score(title: &str, desired: Option<Quality>) -> f32 {
    if let Some(desired) = desired {
        if desired.named_in(title) {
            return 1.0;
        }
    }
    Quality::detect(title).map(|q| q.match_score()).unwrap_or(0.0)
}

pub fn size_fitness_score(size_bytes: u64, desired: Option<Quality>) -> f32 {
    match desired {
        Some(quality) => quality.size_band().fitness(size_bytes),
        None => 0.5,
    }
}

fn catalog_matches(result_id: Option<u64>, target_id: Option<u64>) -> bool {
    match (result_id, target_id) {
        (Some(a), Some(b)) => a != 0 && a == b,
        _ => false,
    }
}
