//! Acquisition lifecycle integration tests.
//!
//! These drive the engine end to end against the mock indexer and download
//! client: movie ranking, and the show fallback from full series to season
//! packs to single episodes.

use std::sync::Arc;
use std::time::Duration;

use seafarer_core::acquisition::queries;
use seafarer_core::matcher::CandidateScorer;
use seafarer_core::testing::{fixtures, MockDownloadClient, MockIndexer};
use seafarer_core::{
    AcquisitionConfig, AcquisitionEngine, AcquisitionStats, EpisodeRef, IndexerError,
    MovieRequest, Quality, SeasonStatus, ShowRequest, SubmitStatus,
};

/// Test helper holding the engine and its mocks.
struct TestHarness {
    indexer: Arc<MockIndexer>,
    client: Arc<MockDownloadClient>,
    engine: AcquisitionEngine,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(AcquisitionConfig::default())
    }

    fn with_config(config: AcquisitionConfig) -> Self {
        let indexer = Arc::new(MockIndexer::new());
        let client = Arc::new(MockDownloadClient::new());
        let engine = AcquisitionEngine::new(indexer.clone(), client.clone(), config);
        Self {
            indexer,
            client,
            engine,
        }
    }
}

fn the_office(seasons: Vec<u32>) -> ShowRequest {
    ShowRequest {
        title: "The Office".to_string(),
        catalog_id: None,
        quality: Some(Quality::Hd1080),
        seasons,
        anime: false,
    }
}

fn dune() -> MovieRequest {
    MovieRequest {
        title: "Dune".to_string(),
        catalog_id: None,
        quality: Some(Quality::Hd1080),
        year: Some(2021),
        anime: false,
    }
}

#[tokio::test]
async fn test_movie_only_result_above_threshold_is_submitted() {
    let harness = TestHarness::new();

    // 0.35 title + 0.07 seeders, no quality token, oversized
    let weak = fixtures::raw_result("Dune.2021.DVDRip", 19, 100);
    // 0.35 title + 0.20 exact quality, no seeders, oversized
    let strong = fixtures::raw_result("Dune.2021.1080p.WEB-DL", 18, 0);

    let scorer = CandidateScorer::default();
    let weak_score = scorer.score(&weak, None, Some(Quality::Hd1080)).total;
    let strong_score = scorer.score(&strong, None, Some(Quality::Hd1080)).total;
    assert!((weak_score - 0.42).abs() < 1e-4);
    assert!((strong_score - 0.55).abs() < 1e-4);

    harness
        .indexer
        .add_results("Dune 2021 1080p", vec![weak, strong.clone()])
        .await;

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_movie(&dune(), &mut stats).await;

    let acquired = outcome.acquired.expect("movie should be acquired");
    assert_eq!(acquired.link, strong.link);
    assert_eq!(harness.client.submitted_links().await, vec![strong.link]);
    assert_eq!(stats.candidates_qualified, 1);
    assert_eq!(stats.results_seen, 2);
}

#[tokio::test]
async fn test_movie_prefers_larger_release_over_higher_score() {
    let harness = TestHarness::new();
    let small = fixtures::movie("Dune", 2021, 438631);
    let mut large = fixtures::raw_result("Dune.2021.1080p.Remux", 18, 20);
    large.catalog_id = None;

    harness
        .indexer
        .add_results("Dune 2021 1080p", vec![small.clone(), large.clone()])
        .await;

    let mut request = dune();
    request.catalog_id = Some(438631);
    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_movie(&request, &mut stats).await;

    // The catalog match scores higher, but both qualify and size decides
    let acquired = outcome.acquired.unwrap();
    assert_eq!(acquired.link, large.link);
}

#[tokio::test]
async fn test_movie_rejects_titles_that_only_mention_target() {
    let harness = TestHarness::new();
    harness
        .indexer
        .add_results(
            "Dune 2021 1080p",
            vec![fixtures::raw_result("Making.Of.Dune.2021.1080p", 8, 500)],
        )
        .await;

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_movie(&dune(), &mut stats).await;

    assert!(!outcome.is_success());
    assert!(harness.client.submitted_links().await.is_empty());
}

#[tokio::test]
async fn test_movie_resubmission_is_success() {
    let harness = TestHarness::new();
    harness
        .indexer
        .add_results("Dune 2021 1080p", vec![fixtures::movie("Dune", 2021, 438631)])
        .await;

    let mut stats = AcquisitionStats::default();
    let first = harness.engine.acquire_movie(&dune(), &mut stats).await;
    let second = harness.engine.acquire_movie(&dune(), &mut stats).await;

    assert_eq!(first.acquired.unwrap().status, SubmitStatus::Accepted);
    assert_eq!(second.acquired.unwrap().status, SubmitStatus::AlreadyPresent);
    assert_eq!(stats.submissions_accepted, 1);
    assert_eq!(stats.submissions_duplicate, 1);
}

#[tokio::test(start_paused = true)]
async fn test_show_falls_back_to_episodes_for_every_season() {
    let harness = TestHarness::new();
    let show = the_office(vec![6, 6]);

    // Everything but S01E04 and S02E06 is available one episode at a time
    for season in 1..=2 {
        for episode in 1..=6 {
            if (season, episode) == (1, 4) || (season, episode) == (2, 6) {
                continue;
            }
            harness
                .indexer
                .add_results(
                    &queries::episode_query("The Office", season, episode, show.quality),
                    vec![fixtures::episode("The.Office", season, episode)],
                )
                .await;
        }
    }

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_show(&show, &mut stats).await;

    let texts = harness.indexer.query_texts().await;
    let expected: Vec<String> = [
        vec![
            "The Office complete series 1080p".to_string(),
            "The Office season 1-2 1080p".to_string(),
        ],
        queries::season_queries("The Office", 1, show.quality),
        (1..=6)
            .map(|e| queries::episode_query("The Office", 1, e, show.quality))
            .collect(),
        queries::season_queries("The Office", 2, show.quality),
        (1..=6)
            .map(|e| queries::episode_query("The Office", 2, e, show.quality))
            .collect(),
    ]
    .concat();
    assert_eq!(texts, expected);

    let episode_queries: Vec<_> = harness
        .indexer
        .recorded_queries()
        .await
        .into_iter()
        .filter(|q| q.text.starts_with('"'))
        .collect();
    assert_eq!(episode_queries.len(), 12);
    for season in episode_queries.chunks(6) {
        for pair in season.windows(2) {
            assert!(pair[1].at - pair[0].at >= Duration::from_millis(500));
        }
    }

    assert!(outcome.series_pack.is_none());
    assert_eq!(
        outcome.seasons[0].status,
        SeasonStatus::Episodes {
            acquired: vec![1, 2, 3, 5, 6],
            missing: vec![4],
        }
    );
    assert_eq!(
        outcome.seasons[1].status,
        SeasonStatus::Episodes {
            acquired: vec![1, 2, 3, 4, 5],
            missing: vec![6],
        }
    );
    assert_eq!(
        outcome.missing_episodes,
        vec![
            EpisodeRef { season: 1, episode: 4 },
            EpisodeRef { season: 2, episode: 6 },
        ]
    );
    assert!(!outcome.is_complete());
    assert_eq!(harness.client.submitted_links().await.len(), 10);
    assert_eq!(stats.indexer_queries, 20);
}

#[tokio::test(start_paused = true)]
async fn test_show_mixes_season_packs_and_episodes() {
    let harness = TestHarness::new();
    let show = the_office(vec![2, 3]);

    harness
        .indexer
        .add_results(
            "The Office season 1 complete 1080p",
            vec![fixtures::season_pack("The.Office", 1)],
        )
        .await;
    for episode in 1..=3 {
        harness
            .indexer
            .add_results(
                &queries::episode_query("The Office", 2, episode, show.quality),
                vec![fixtures::episode("The.Office", 2, episode)],
            )
            .await;
    }

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_show(&show, &mut stats).await;

    assert!(matches!(outcome.seasons[0].status, SeasonStatus::SeasonPack { .. }));
    assert_eq!(
        outcome.seasons[1].status,
        SeasonStatus::Episodes {
            acquired: vec![1, 2, 3],
            missing: vec![],
        }
    );
    assert!(outcome.is_complete());
    assert!(outcome.missing_episodes.is_empty());
    // No season 1 episode was ever queried
    let texts = harness.indexer.query_texts().await;
    assert!(!texts.iter().any(|t| t.contains("S01E")));
}

#[tokio::test(start_paused = true)]
async fn test_show_episode_results_must_match_episode() {
    let harness = TestHarness::new();
    let show = the_office(vec![2]);

    // The indexer answers every episode query with S01E02
    harness
        .indexer
        .set_query_handler(|q| {
            q.contains("S01E")
                .then(|| vec![fixtures::episode("The.Office", 1, 2)])
        })
        .await;

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_show(&show, &mut stats).await;

    assert_eq!(
        outcome.seasons[0].status,
        SeasonStatus::Episodes {
            acquired: vec![2],
            missing: vec![1],
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_show_with_nothing_available() {
    let harness = TestHarness::new();
    harness
        .indexer
        .fail_query(
            "The Office complete series 1080p",
            IndexerError::ConnectionFailed("refused".to_string()),
        )
        .await;

    let mut stats = AcquisitionStats::default();
    let outcome = harness.engine.acquire_show(&the_office(vec![3]), &mut stats).await;

    assert_eq!(
        outcome.seasons[0].status,
        SeasonStatus::Missing {
            episodes: vec![1, 2, 3]
        }
    );
    assert_eq!(outcome.missing_episodes.len(), 3);
    assert_eq!(stats.indexer_errors, 1);
    // 1 series + 3 season + 3 episode queries
    assert_eq!(stats.indexer_queries, 7);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_acquisitions_keep_separate_stats() {
    let harness = TestHarness::with_config(AcquisitionConfig {
        episode_delay_ms: 0,
        ..Default::default()
    });
    harness
        .indexer
        .add_results("Dune 2021 1080p", vec![fixtures::movie("Dune", 2021, 438631)])
        .await;

    let mut movie_stats = AcquisitionStats::default();
    let mut show_stats = AcquisitionStats::default();
    let show = the_office(vec![1]);
    let movie = dune();

    let (movie_outcome, show_outcome) = tokio::join!(
        harness.engine.acquire_movie(&movie, &mut movie_stats),
        harness.engine.acquire_show(&show, &mut show_stats),
    );

    assert!(movie_outcome.is_success());
    assert!(!show_outcome.is_complete());
    assert_eq!(movie_stats.indexer_queries, 1);
    assert_eq!(movie_stats.submissions_accepted, 1);
    assert_eq!(show_stats.indexer_queries, 1 + 3 + 1);
    assert_eq!(show_stats.submissions(), 0);
}
