use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SEAFARER_CONFIG";

/// Prefix for per-key environment overrides.
const ENV_PREFIX: &str = "SEAFARER_";

/// Config file location: `$SEAFARER_CONFIG`, or `config.toml` in the
/// working directory.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are separated by a double underscore, e.g.
/// `SEAFARER_DOWNLOAD_CLIENT__BACKEND=deluge` or
/// `SEAFARER_ACQUISITION__MIN_SCORE=0.6`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__")),
    )
}

/// Load configuration from a TOML string, without environment overrides.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DownloadClientBackend;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DELUGE: &str = r#"
[server]
port = 9000

[indexer]
backend = "jackett"

[indexer.jackett]
url = "http://localhost:9117"
api_key = "key"

[download_client]
backend = "deluge"

[download_client.deluge]
url = "http://localhost:8112"
password = "deluge"
"#;

    #[test]
    fn test_acquisition_defaults_apply_when_section_absent() {
        let config = load_config_from_str(DELUGE).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.download_client.backend, DownloadClientBackend::Deluge);
        assert_eq!(config.acquisition.min_score, 0.5);
        assert_eq!(config.acquisition.episode_delay_ms, 500);
        assert_eq!(config.acquisition.weights.seeders, 0.35);
    }

    #[test]
    fn test_partial_weights_keep_other_defaults() {
        let toml = format!("{}\n[acquisition.weights]\nsize = 0.25\n", DELUGE);
        let config = load_config_from_str(&toml).unwrap();
        assert_eq!(config.acquisition.weights.size, 0.25);
        assert_eq!(config.acquisition.weights.title, 0.35);
        assert_eq!(config.acquisition.max_submissions_per_tier, 3);
    }

    #[test]
    fn test_missing_indexer_section_is_parse_error() {
        let result = load_config_from_str("[server]\nport = 8080\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let toml = DELUGE.replace("backend = \"deluge\"", "backend = \"transmission\"");
        assert!(matches!(
            load_config_from_str(&toml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/seafarer.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}\n[acquisition]\nepisode_delay_ms = 250\n", DELUGE).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.acquisition.episode_delay_ms, 250);
        assert!(config.download_client.deluge.is_some());
        assert!(config.download_client.qbittorrent.is_none());
    }
}
