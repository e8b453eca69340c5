//! Request, outcome and bookkeeping types for acquisitions.

use serde::{Deserialize, Serialize};

use crate::download_client::SubmitStatus;
use crate::matcher::{Quality, ScoredCandidate};

/// A movie to acquire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRequest {
    pub title: String,
    /// External catalog id (TMDB). `None` or `Some(0)` means unknown.
    #[serde(default)]
    pub catalog_id: Option<u64>,
    #[serde(default)]
    pub quality: Option<Quality>,
    /// Release year, appended to the query when known.
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub anime: bool,
}

/// A show to acquire, with its season layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowRequest {
    pub title: String,
    #[serde(default)]
    pub catalog_id: Option<u64>,
    #[serde(default)]
    pub quality: Option<Quality>,
    /// Episode count per season, season 1 first.
    pub seasons: Vec<u32>,
    #[serde(default)]
    pub anime: bool,
}

impl ShowRequest {
    pub fn season_count(&self) -> u32 {
        self.seasons.len() as u32
    }

    /// Episode count of a 1-based season number.
    pub fn episode_count(&self, season: u32) -> u32 {
        season
            .checked_sub(1)
            .and_then(|idx| self.seasons.get(idx as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Episode number counted from the first episode of season 1.
    pub fn absolute_episode(&self, season: u32, episode: u32) -> u32 {
        let before: u32 = self
            .seasons
            .iter()
            .take(season.saturating_sub(1) as usize)
            .sum();
        before + episode
    }
}

/// A candidate the download client took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquiredCandidate {
    pub title: String,
    pub link: String,
    pub size_bytes: u64,
    pub seeders: u32,
    pub score: f32,
    pub status: SubmitStatus,
}

impl AcquiredCandidate {
    pub fn new(candidate: &ScoredCandidate, status: SubmitStatus) -> Self {
        Self {
            title: candidate.result.title.clone(),
            link: candidate.result.link.clone(),
            size_bytes: candidate.result.size_bytes,
            seeders: candidate.result.seeders,
            score: candidate.score,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieOutcome {
    pub acquired: Option<AcquiredCandidate>,
}

impl MovieOutcome {
    pub fn is_success(&self) -> bool {
        self.acquired.is_some()
    }
}

/// How one season ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SeasonStatus {
    /// Covered by the full-series pack.
    SeriesPack,
    /// Acquired as a single season bundle.
    SeasonPack { candidate: AcquiredCandidate },
    /// Fell back to per-episode queries and got at least one episode.
    Episodes { acquired: Vec<u32>, missing: Vec<u32> },
    /// Nothing found for this season.
    Missing { episodes: Vec<u32> },
}

impl SeasonStatus {
    /// Episode numbers of this season that were not acquired.
    pub fn missing(&self) -> &[u32] {
        match self {
            SeasonStatus::SeriesPack | SeasonStatus::SeasonPack { .. } => &[],
            SeasonStatus::Episodes { missing, .. } => missing,
            SeasonStatus::Missing { episodes } => episodes,
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            SeasonStatus::Missing { .. } => false,
            _ => self.missing().is_empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonOutcome {
    pub season: u32,
    #[serde(flatten)]
    pub status: SeasonStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowOutcome {
    /// Set when one full-series pack covered every season.
    pub series_pack: Option<AcquiredCandidate>,
    pub seasons: Vec<SeasonOutcome>,
    /// Every episode that could not be acquired, across all seasons.
    pub missing_episodes: Vec<EpisodeRef>,
}

impl ShowOutcome {
    pub fn is_complete(&self) -> bool {
        self.seasons.iter().all(|s| s.status.is_complete())
    }
}

/// Counters accumulated over one acquisition call.
///
/// Passed in by the caller so concurrent acquisitions never share counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionStats {
    pub indexer_queries: u32,
    pub indexer_errors: u32,
    pub results_seen: u32,
    pub candidates_qualified: u32,
    pub submissions_accepted: u32,
    pub submissions_duplicate: u32,
    pub submissions_failed: u32,
}

impl AcquisitionStats {
    pub fn submissions(&self) -> u32 {
        self.submissions_accepted + self.submissions_duplicate + self.submissions_failed
    }

    pub(crate) fn record_submission(&mut self, status: Option<SubmitStatus>) {
        match status {
            Some(SubmitStatus::Accepted) => self.submissions_accepted += 1,
            Some(SubmitStatus::AlreadyPresent) => self.submissions_duplicate += 1,
            None => self.submissions_failed += 1,
        }
    }

    /// Fold another call's counters into this one.
    pub fn merge(&mut self, other: &AcquisitionStats) {
        self.indexer_queries += other.indexer_queries;
        self.indexer_errors += other.indexer_errors;
        self.results_seen += other.results_seen;
        self.candidates_qualified += other.candidates_qualified;
        self.submissions_accepted += other.submissions_accepted;
        self.submissions_duplicate += other.submissions_duplicate;
        self.submissions_failed += other.submissions_failed;
    }
}
