//! Title matching and candidate ranking.
//!
//! Everything in here is pure: no I/O, no shared state. The acquisition
//! engine feeds raw indexer responses through [`ResultProcessor`] and uses
//! the season classifier to tell bundles from single episodes.

mod normalize;
mod processor;
mod quality;
mod scorer;
mod season_pack;

pub use normalize::{matches_target, normalize_result_title, normalize_target_title, title_tokens};
pub use processor::{ResultProcessor, ScoredCandidate};
pub use quality::{Quality, SizeBand, UnknownQuality};
pub use scorer::{
    quality_match_score, seeder_score, size_fitness_score, title_quality_score, CandidateScorer,
    ScoreBreakdown,
};
pub use season_pack::{
    has_absolute_episode, has_episode, has_episode_marker, is_season_pack, is_series_pack,
};
