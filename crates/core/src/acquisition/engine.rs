//! The acquisition engine.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::AcquisitionConfig;
use crate::download_client::DownloadClient;
use crate::indexer::{Category, Indexer, RawResult};
use crate::matcher::{
    has_absolute_episode, has_episode, is_season_pack, is_series_pack, Quality, ResultProcessor,
    ScoredCandidate,
};

use super::gateway::SubmissionGateway;
use super::queries;
use super::strategy::{Tier, TierResult};
use super::types::{
    AcquiredCandidate, AcquisitionStats, EpisodeRef, MovieOutcome, MovieRequest, SeasonOutcome,
    SeasonStatus, ShowOutcome, ShowRequest,
};

/// Searches the indexer, ranks what comes back and submits the winner.
///
/// Holds only immutable configuration and collaborator handles, so one
/// engine can serve any number of concurrent acquisitions.
pub struct AcquisitionEngine {
    indexer: Arc<dyn Indexer>,
    gateway: SubmissionGateway,
    processor: ResultProcessor,
    config: AcquisitionConfig,
}

impl AcquisitionEngine {
    pub fn new(
        indexer: Arc<dyn Indexer>,
        download_client: Arc<dyn DownloadClient>,
        config: AcquisitionConfig,
    ) -> Self {
        Self {
            indexer,
            gateway: SubmissionGateway::new(download_client),
            processor: ResultProcessor::from_config(&config),
            config,
        }
    }

    /// Acquire a movie with a single query.
    pub async fn acquire_movie(
        &self,
        request: &MovieRequest,
        stats: &mut AcquisitionStats,
    ) -> MovieOutcome {
        let categories = queries::movie_categories(request.anime);
        let query = queries::movie_query(&request.title, request.year, request.quality);
        info!(title = %request.title, query = %query, "Acquiring movie");

        let results = self.search(&categories, &query, stats).await;
        let candidates =
            self.rank(results, &request.title, request.catalog_id, request.quality, stats);
        let acquired = self.submit_best(&candidates, stats).await;

        match &acquired {
            Some(c) => info!(title = %request.title, release = %c.title, "Movie acquired"),
            None => warn!(title = %request.title, "No qualifying release for movie"),
        }

        MovieOutcome { acquired }
    }

    /// Acquire a show, falling back from a full-series pack to season
    /// packs to single episodes.
    pub async fn acquire_show(
        &self,
        request: &ShowRequest,
        stats: &mut AcquisitionStats,
    ) -> ShowOutcome {
        let season_count = request.season_count();
        let categories = queries::show_categories(request.anime);
        info!(title = %request.title, seasons = season_count, "Acquiring show");

        let mut series_pack = None;
        let mut seasons = Vec::with_capacity(season_count as usize);
        let mut tier = Tier::start(season_count);

        while !tier.is_done() {
            debug!(title = %request.title, ?tier, "Entering tier");
            let result = match tier {
                Tier::FullSeries => {
                    series_pack = self.try_full_series(request, &categories, stats).await;
                    if series_pack.is_some() {
                        seasons.extend((1..=season_count).map(|season| SeasonOutcome {
                            season,
                            status: SeasonStatus::SeriesPack,
                        }));
                        TierResult::Acquired
                    } else {
                        TierResult::Exhausted
                    }
                }
                Tier::SeasonPack { season } => {
                    match self.try_season_pack(request, season, &categories, stats).await {
                        Some(candidate) => {
                            seasons.push(SeasonOutcome {
                                season,
                                status: SeasonStatus::SeasonPack { candidate },
                            });
                            TierResult::Acquired
                        }
                        None => TierResult::Exhausted,
                    }
                }
                Tier::Episodes { season } => {
                    let status = self.try_episodes(request, season, &categories, stats).await;
                    let result = if matches!(status, SeasonStatus::Missing { .. }) {
                        TierResult::Exhausted
                    } else {
                        TierResult::Acquired
                    };
                    seasons.push(SeasonOutcome { season, status });
                    result
                }
                Tier::Done => break,
            };
            tier = tier.next(result, season_count);
        }

        let missing_episodes: Vec<EpisodeRef> = seasons
            .iter()
            .flat_map(|s| {
                s.status.missing().iter().map(move |&episode| EpisodeRef {
                    season: s.season,
                    episode,
                })
            })
            .collect();

        info!(
            title = %request.title,
            series_pack = series_pack.is_some(),
            missing = missing_episodes.len(),
            "Show acquisition finished"
        );

        ShowOutcome {
            series_pack,
            seasons,
            missing_episodes,
        }
    }

    async fn try_full_series(
        &self,
        request: &ShowRequest,
        categories: &[Category],
        stats: &mut AcquisitionStats,
    ) -> Option<AcquiredCandidate> {
        let season_count = request.season_count();
        let variants = queries::series_queries(&request.title, season_count, request.quality);
        for query in variants {
            let results: Vec<RawResult> = self
                .search(categories, &query, stats)
                .await
                .into_iter()
                .filter(|r| is_series_pack(&r.title, season_count))
                .collect();
            let candidates =
                self.rank(results, &request.title, request.catalog_id, request.quality, stats);
            if let Some(acquired) = self.submit_best(&candidates, stats).await {
                info!(
                    title = %request.title,
                    release = %acquired.title,
                    "Full series pack acquired"
                );
                return Some(acquired);
            }
        }
        None
    }

    async fn try_season_pack(
        &self,
        request: &ShowRequest,
        season: u32,
        categories: &[Category],
        stats: &mut AcquisitionStats,
    ) -> Option<AcquiredCandidate> {
        let mut seen = HashSet::new();
        let mut combined = Vec::new();
        for query in queries::season_queries(&request.title, season, request.quality) {
            for result in self.search(categories, &query, stats).await {
                if seen.insert(result.link.clone()) {
                    combined.push(result);
                }
            }
        }

        let packs: Vec<ScoredCandidate> = self
            .rank(combined, &request.title, request.catalog_id, request.quality, stats)
            .into_iter()
            .filter(|c| is_season_pack(&c.result.title, season))
            .collect();

        let acquired = self.submit_best(&packs, stats).await;
        match &acquired {
            Some(c) => {
                info!(title = %request.title, season, release = %c.title, "Season pack acquired")
            }
            None => {
                info!(title = %request.title, season, "No season pack, falling back to episodes")
            }
        }
        acquired
    }

    async fn try_episodes(
        &self,
        request: &ShowRequest,
        season: u32,
        categories: &[Category],
        stats: &mut AcquisitionStats,
    ) -> SeasonStatus {
        let episode_count = request.episode_count(season);
        let delay = Duration::from_millis(self.config.episode_delay_ms);
        let mut acquired = Vec::new();
        let mut missing = Vec::new();

        for episode in 1..=episode_count {
            if episode > 1 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let absolute = request
                .anime
                .then(|| request.absolute_episode(season, episode));
            let query = match absolute {
                Some(n) => queries::anime_episode_query(&request.title, n, request.quality),
                None => queries::episode_query(&request.title, season, episode, request.quality),
            };
            let results: Vec<RawResult> = self
                .search(categories, &query, stats)
                .await
                .into_iter()
                .filter(|r| {
                    has_episode(&r.title, season, episode)
                        || absolute.is_some_and(|n| has_absolute_episode(&r.title, n))
                })
                .collect();
            let candidates =
                self.rank(results, &request.title, request.catalog_id, request.quality, stats);

            if self.submit_best(&candidates, stats).await.is_some() {
                acquired.push(episode);
            } else {
                debug!(title = %request.title, season, episode, "Episode missing");
                missing.push(episode);
            }
        }

        if !missing.is_empty() {
            warn!(
                title = %request.title,
                season,
                acquired = acquired.len(),
                missing = ?missing,
                "Season incomplete"
            );
        }

        if acquired.is_empty() {
            SeasonStatus::Missing { episodes: missing }
        } else {
            SeasonStatus::Episodes { acquired, missing }
        }
    }

    /// Query the indexer; an error counts as an empty response.
    async fn search(
        &self,
        categories: &[Category],
        query: &str,
        stats: &mut AcquisitionStats,
    ) -> Vec<RawResult> {
        stats.indexer_queries += 1;
        match self.indexer.query(categories, query).await {
            Ok(results) => {
                stats.results_seen += results.len() as u32;
                results
            }
            Err(e) => {
                stats.indexer_errors += 1;
                warn!(
                    indexer = self.indexer.name(),
                    query = %query,
                    error = %e,
                    "Indexer query failed"
                );
                Vec::new()
            }
        }
    }

    fn rank(
        &self,
        results: Vec<RawResult>,
        title: &str,
        catalog_id: Option<u64>,
        quality: Option<Quality>,
        stats: &mut AcquisitionStats,
    ) -> Vec<ScoredCandidate> {
        let candidates = self.processor.process(results, title, catalog_id, quality);
        stats.candidates_qualified += candidates.len() as u32;
        candidates
    }

    /// Submit candidates in order until one succeeds, trying at most
    /// `max_submissions_per_tier` of them.
    async fn submit_best(
        &self,
        candidates: &[ScoredCandidate],
        stats: &mut AcquisitionStats,
    ) -> Option<AcquiredCandidate> {
        for candidate in candidates.iter().take(self.config.max_submissions_per_tier) {
            if let Some(status) = self.gateway.submit(candidate, stats).await {
                return Some(AcquiredCandidate::new(candidate, status));
            }
        }
        None
    }
}
