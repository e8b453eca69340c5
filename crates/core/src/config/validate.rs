use super::{types::Config, ConfigError, DownloadClientBackend, IndexerBackend};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - The selected indexer and download client backends have their section
/// - Score weights are within [0, 1] and min_score within [0, 2]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    match config.indexer.backend {
        IndexerBackend::Jackett => match &config.indexer.jackett {
            Some(j) if j.url.trim().is_empty() => {
                return Err(invalid("indexer.jackett.url cannot be empty"));
            }
            Some(j) if j.api_key.trim().is_empty() => {
                return Err(invalid("indexer.jackett.api_key cannot be empty"));
            }
            Some(_) => {}
            None => return Err(invalid("indexer.jackett section is required")),
        },
    }

    let client_url = match config.download_client.backend {
        DownloadClientBackend::QBittorrent => config
            .download_client
            .qbittorrent
            .as_ref()
            .map(|q| q.url.as_str()),
        DownloadClientBackend::Deluge => config
            .download_client
            .deluge
            .as_ref()
            .map(|d| d.url.as_str()),
    };
    match client_url {
        Some(url) if url.trim().is_empty() => {
            return Err(invalid("download_client url cannot be empty"));
        }
        Some(_) => {}
        None => {
            return Err(invalid(
                "download_client section for the selected backend is required",
            ))
        }
    }

    let acquisition = &config.acquisition;
    if !(0.0..=2.0).contains(&acquisition.min_score) {
        return Err(invalid("acquisition.min_score must be within [0, 2]"));
    }
    let w = &acquisition.weights;
    for (name, value) in [
        ("title", w.title),
        ("seeders", w.seeders),
        ("quality", w.quality),
        ("size", w.size),
        ("catalog_bonus", w.catalog_bonus),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "acquisition.weights.{} must be within [0, 1]",
                name
            )));
        }
    }
    if acquisition.max_submissions_per_tier == 0 {
        return Err(invalid("acquisition.max_submissions_per_tier cannot be 0"));
    }

    Ok(())
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::ValidationError(msg.to_string())
}
