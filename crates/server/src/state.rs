use std::sync::Arc;

use seafarer_core::{AcquisitionEngine, Config, DownloadClient, Indexer, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    engine: AcquisitionEngine,
}

impl AppState {
    pub fn new(
        config: Config,
        indexer: Arc<dyn Indexer>,
        download_client: Arc<dyn DownloadClient>,
    ) -> Self {
        let engine = AcquisitionEngine::new(indexer, download_client, config.acquisition.clone());
        Self { config, engine }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn engine(&self) -> &AcquisitionEngine {
        &self.engine
    }
}
