//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Manages all user-editable settings for the catalog browser. Loads and saves
//! settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save_to(Path::new("config.toml")).await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::error::AppError;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "example";
const APPLICATION: &str = "CatalogBrowser";

/// Remote catalog source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Collection endpoint, without the page-size parameter.
    pub endpoint: String,

    /// Number of products requested in the single startup fetch.
    pub page_size: u32,

    /// Optional request timeout. Unset means the fetch may wait indefinitely.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<Duration>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://dummyjson.com/products".to_string(),
            page_size: 12,
            request_timeout: None,
        }
    }
}

/// Search input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Idle period before raw search text reaches the pipeline.
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
        }
    }
}

/// Durable favorites storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the favorites list is stored under.
    pub favorites_key: String,

    /// Store file override. Defaults to `store.json` in the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            favorites_key: "kidz-favs".to_string(),
            path: None,
        }
    }
}

/// Mirroring of filter state into a shareable location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySyncConfig {
    pub enabled: bool,

    /// Location the query string is attached to.
    pub base_url: String,
}

impl Default for QuerySyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "catalog://browse".to_string(),
        }
    }
}

/// Log file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,

    pub file_prefix: String,

    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            file_prefix: "catalog".to_string(),
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub query_sync: QuerySyncConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads config from the platform config dir, or writes and returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/CatalogBrowser/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> Result<Self, AppError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path).await
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(&path).await?;

            Ok(default_config)
        }
    }

    /// Loads config from an explicit TOML file.
    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        info!("Loading config from {}", path.display());
        let text = TokioFs::read_to_string(path)
            .await
            .map_err(|source| AppError::ConfigIo {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(toml::from_str(&text)?)
    }

    /// Saves config as pretty TOML at `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Resolves the durable store file: the configured override or the data dir.
    pub fn store_path(&self) -> Result<PathBuf, AppError> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("store.json")),
        }
    }

    fn project_dirs() -> Result<ProjectDirs, AppError> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or_else(|| AppError::Other("Could not determine project directories.".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_catalog_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.catalog.page_size, 12);
        assert_eq!(cfg.search.debounce, Duration::from_millis(300));
        assert_eq!(cfg.storage.favorites_key, "kidz-favs");
        assert!(cfg.catalog.request_timeout.is_none());
        assert!(cfg.query_sync.enabled);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [search]
            debounce = "150ms"

            [query_sync]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(cfg.search.debounce, Duration::from_millis(150));
        assert!(!cfg.query_sync.enabled);
        assert_eq!(cfg.query_sync.base_url, "catalog://browse");
        assert_eq!(cfg.catalog.endpoint, "https://dummyjson.com/products");
    }

    #[tokio::test]
    async fn test_save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.catalog.request_timeout = Some(Duration::from_secs(5));
        cfg.storage.favorites_key = "favs".into();
        cfg.save_to(&path).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded.catalog.request_timeout, Some(Duration::from_secs(5)));
        assert_eq!(loaded.storage.favorites_key, "favs");
    }

    #[tokio::test]
    async fn test_load_from_missing_file_is_config_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigIo { .. }));
    }
}
