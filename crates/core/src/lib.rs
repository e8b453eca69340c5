pub mod acquisition;
pub mod config;
pub mod download_client;
pub mod indexer;
pub mod matcher;
pub mod testing;

pub use acquisition::{
    AcquiredCandidate, AcquisitionEngine, AcquisitionStats, EpisodeRef, MovieOutcome,
    MovieRequest, SeasonOutcome, SeasonStatus, ShowOutcome, ShowRequest,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AcquisitionConfig, Config, ConfigError,
    DownloadClientBackend, IndexerBackend, SanitizedConfig, ScoreWeights,
};
pub use download_client::{
    DelugeClient, DownloadClient, DownloadClientError, QBittorrentClient, SubmitStatus,
};
pub use indexer::{Category, Indexer, IndexerError, JackettIndexer, RawResult};
pub use matcher::{Quality, ResultProcessor, ScoredCandidate};
