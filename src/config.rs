//! Configuration management for Wallpaper Gallery
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, file discovery, and zero-config defaults. The
//! TOML-friendly sections convert into the runtime configs of the catalog
//! engine, and [`AppConfig::build_store`] assembles a ready [`WallpaperStore`].

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::app::{
    Catalog, CatalogConfig, ClientConfig, DecodeWorker, Decoder, Fetcher, HttpTransport,
    LoaderConfig, LocalFileTransport, RetryPolicy, Transport, WallpaperStore,
};
use crate::constants::{cdn, config as paths, decoder, http, limits, loading};
use crate::errors::{ConfigError, ConfigResult, Result};

/// Data root used when the catalog is served from a local directory
const LOCAL_DATA_BASE_URL: &str = "./data";

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Catalog endpoints and data source
    pub catalog: CatalogConfigToml,
    /// Loading strategy, retry and decode settings
    pub loading: LoadingConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// TCP keep-alive (None = disabled)
    #[serde(with = "humantime_serde")]
    pub tcp_keepalive: Option<Duration>,
    /// Connection pool idle timeout (None = no timeout)
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Rate limit (requests per second)
    pub rate_limit_rps: u32,
    pub user_agent: String,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            tcp_keepalive: Some(Duration::from_secs(30)),
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            rate_limit_rps: limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent: http::USER_AGENT.to_string(),
        }
    }
}

/// TOML-friendly catalog configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfigToml {
    /// Catalog data root; defaults to the CDN, or `./data` with a local data dir
    pub data_base_url: Option<String>,
    pub image_base_url: String,
    pub feed_uhd_base_url: String,
    pub feed_preview_base_url: String,
    /// Version tag appended to data URLs
    pub cache_buster: Option<String>,
    /// Directory containing a bundled `data/` tree
    pub local_data_dir: Option<PathBuf>,
}

impl Default for CatalogConfigToml {
    fn default() -> Self {
        Self {
            data_base_url: None,
            image_base_url: cdn::IMAGE_BASE_URL.to_string(),
            feed_uhd_base_url: cdn::FEED_UHD_BASE_URL.to_string(),
            feed_preview_base_url: cdn::FEED_PREVIEW_BASE_URL.to_string(),
            cache_buster: None,
            local_data_dir: None,
        }
    }
}

/// TOML-friendly loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadingConfigToml {
    /// Categories loaded in the foreground
    pub initial_category_count: usize,
    /// Categories per background batch
    pub category_batch_size: usize,
    #[serde(with = "humantime_serde")]
    pub category_batch_pause: Duration,
    #[serde(with = "humantime_serde")]
    pub year_file_pause: Duration,
    pub default_page_size: usize,
    /// Fetch attempts per request
    pub max_attempts: u32,
    /// Base delay of the linear retry backoff
    #[serde(with = "humantime_serde")]
    pub retry_base_delay: Duration,
    /// Decode large payloads on the background worker
    pub decode_worker: bool,
    /// Payload length (chars) above which the worker is used
    pub decode_worker_threshold: usize,
    /// Fixed `YYYY-MM` month for the daily feed instead of the current one
    pub pinned_month: Option<String>,
}

impl Default for LoadingConfigToml {
    fn default() -> Self {
        Self {
            initial_category_count: loading::INITIAL_CATEGORY_COUNT,
            category_batch_size: loading::CATEGORY_BATCH_SIZE,
            category_batch_pause: loading::CATEGORY_BATCH_PAUSE,
            year_file_pause: loading::YEAR_FILE_PAUSE,
            default_page_size: loading::DEFAULT_PAGE_SIZE,
            max_attempts: limits::MAX_ATTEMPTS,
            retry_base_delay: Duration::from_millis(limits::RETRY_BASE_DELAY_MS),
            decode_worker: true,
            decode_worker_threshold: decoder::WORKER_THRESHOLD,
            pinned_month: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, CatalogConfig, LoaderConfig) {
        (
            self.client.to_runtime_config(),
            self.catalog.to_runtime_config(),
            self.loading.to_runtime_config(),
        )
    }

    /// Check every section for out-of-range values
    pub fn validate(&self) -> ConfigResult<()> {
        self.client.validate()?;
        self.catalog.validate()?;
        self.loading.validate()?;

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                &self.logging.level,
                "Expected one of error, warn, info, debug, trace",
            ));
        }
        Ok(())
    }

    /// Assemble a store from this configuration
    ///
    /// Must be called inside a tokio runtime when the decode worker is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the HTTP client cannot be built
    pub fn build_store(&self) -> Result<WallpaperStore> {
        self.validate()?;
        let (client_config, catalog_config, loader_config) = self.to_runtime_config();

        let http: Arc<dyn Transport> = Arc::new(HttpTransport::from_config(&client_config)?);
        let transport: Arc<dyn Transport> = match &catalog_config.local_data_dir {
            Some(dir) => {
                info!("Serving catalog data from {}", dir.display());
                Arc::new(LocalFileTransport::new(dir.clone()).with_fallback(http))
            }
            None => http,
        };

        let decoder = if self.loading.decode_worker {
            Decoder::with_offload(
                Arc::new(DecodeWorker::spawn()),
                self.loading.decode_worker_threshold,
            )
        } else {
            Decoder::inline()
        };

        let fetcher = Fetcher::new(transport, self.loading.retry_policy());
        let catalog = Catalog::from_config(&catalog_config, fetcher, decoder);
        Ok(WallpaperStore::new(Arc::new(catalog), loader_config))
    }

    /// Load configuration from an explicit file or the standard locations
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path }.into());
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        let config = match config_path {
            Some(path) => Self::load_from_file(&path).await?,
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<PathBuf> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            return Ok(config_path);
        }

        info!("Creating default configuration file...");

        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(config_path)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            PathBuf::from(".").join(paths::LOCAL_FILE),
            PathBuf::from(".").join(paths::FILE_NAME),
        ];
        if let Ok(user_config) = Self::get_default_config_path() {
            search_paths.push(user_config);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        match &found {
            Some(path) => debug!("Found config file: {}", path.display()),
            None => debug!("No config file found in standard locations"),
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join(paths::APP_DIR).join(paths::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;
        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# Wallpaper Gallery Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[client]
request_timeout = "{request_timeout}"
connect_timeout = "{connect_timeout}"
tcp_keepalive = "30s"
pool_idle_timeout = "{pool_idle_timeout}"
pool_max_per_host = {pool_max_per_host}
rate_limit_rps = {rate_limit_rps}
user_agent = "{user_agent}"

[catalog]
# Catalog data root (defaults to the CDN, or ./data with local_data_dir)
# data_base_url = "{data_base_url}"
image_base_url = "{image_base_url}"
feed_uhd_base_url = "{feed_uhd_base_url}"
feed_preview_base_url = "{feed_preview_base_url}"
# Appended to every data URL as ?v=<tag>
# cache_buster = "20250101"
# Directory holding a bundled data/ tree
# local_data_dir = "/path/to/app"

[loading]
initial_category_count = {initial_category_count}
category_batch_size = {category_batch_size}
category_batch_pause = "{category_batch_pause}"
year_file_pause = "{year_file_pause}"
default_page_size = {default_page_size}
max_attempts = {max_attempts}
retry_base_delay = "{retry_base_delay}"
decode_worker = true
decode_worker_threshold = {decode_worker_threshold}
# Show this month of the daily feed instead of the current one
# pinned_month = "2025-01"

[logging]
level = "info"  # error, warn, info, debug, trace
colored_output = true
"#,
            request_timeout = humantime::format_duration(http::DEFAULT_TIMEOUT),
            connect_timeout = humantime::format_duration(http::CONNECT_TIMEOUT),
            pool_idle_timeout = humantime::format_duration(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host = http::POOL_MAX_PER_HOST,
            rate_limit_rps = limits::DEFAULT_RATE_LIMIT_RPS,
            user_agent = http::USER_AGENT,
            data_base_url = cdn::DATA_BASE_URL,
            image_base_url = cdn::IMAGE_BASE_URL,
            feed_uhd_base_url = cdn::FEED_UHD_BASE_URL,
            feed_preview_base_url = cdn::FEED_PREVIEW_BASE_URL,
            initial_category_count = loading::INITIAL_CATEGORY_COUNT,
            category_batch_size = loading::CATEGORY_BATCH_SIZE,
            category_batch_pause = humantime::format_duration(loading::CATEGORY_BATCH_PAUSE),
            year_file_pause = humantime::format_duration(loading::YEAR_FILE_PAUSE),
            default_page_size = loading::DEFAULT_PAGE_SIZE,
            max_attempts = limits::MAX_ATTEMPTS,
            retry_base_delay =
                humantime::format_duration(Duration::from_millis(limits::RETRY_BASE_DELAY_MS)),
            decode_worker_threshold = decoder::WORKER_THRESHOLD,
        )
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            tcp_keepalive: self.tcp_keepalive,
            pool_idle_timeout: self.pool_idle_timeout,
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            rate_limit_rps: self.rate_limit_rps,
            user_agent: self.user_agent.clone(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.rate_limit_rps == 0 {
            return Err(ConfigError::invalid(
                "client.rate_limit_rps",
                self.rate_limit_rps,
                "Rate limit must be greater than 0",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "client.request_timeout",
                humantime::format_duration(self.request_timeout),
                "Timeout must be greater than 0",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::invalid(
                "client.connect_timeout",
                humantime::format_duration(self.connect_timeout),
                "Timeout must be greater than 0",
            ));
        }
        Ok(())
    }
}

impl CatalogConfigToml {
    /// Convert to runtime CatalogConfig
    pub fn to_runtime_config(&self) -> CatalogConfig {
        let data_base_url = match (&self.data_base_url, &self.local_data_dir) {
            (Some(url), _) => url.clone(),
            (None, Some(_)) => LOCAL_DATA_BASE_URL.to_string(),
            (None, None) => cdn::DATA_BASE_URL.to_string(),
        };

        CatalogConfig {
            data_base_url: data_base_url.trim_end_matches('/').to_string(),
            image_base_url: self.image_base_url.clone(),
            feed_uhd_base_url: self.feed_uhd_base_url.clone(),
            feed_preview_base_url: self.feed_preview_base_url.clone(),
            cache_buster: self.cache_buster.clone(),
            local_data_dir: self.local_data_dir.clone(),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = &self.data_base_url {
            let is_relative = LocalFileTransport::is_local(url);
            if is_relative && self.local_data_dir.is_none() {
                return Err(ConfigError::invalid(
                    "catalog.data_base_url",
                    url,
                    "A relative data root requires catalog.local_data_dir",
                ));
            }
            if !is_relative {
                check_url("catalog.data_base_url", url)?;
            }
        }
        check_url("catalog.image_base_url", &self.image_base_url)?;
        check_url("catalog.feed_uhd_base_url", &self.feed_uhd_base_url)?;
        check_url("catalog.feed_preview_base_url", &self.feed_preview_base_url)?;

        if let Some(tag) = &self.cache_buster {
            if tag.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "catalog.cache_buster",
                    tag,
                    "Cache buster must not be blank",
                ));
            }
        }
        if let Some(dir) = &self.local_data_dir {
            if !dir.is_dir() {
                return Err(ConfigError::invalid(
                    "catalog.local_data_dir",
                    dir.display(),
                    "Directory does not exist",
                ));
            }
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> ConfigResult<()> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(field, value, e.to_string()))
}

impl LoadingConfigToml {
    /// Convert to runtime LoaderConfig
    pub fn to_runtime_config(&self) -> LoaderConfig {
        LoaderConfig {
            initial_category_count: self.initial_category_count,
            category_batch_size: self.category_batch_size,
            category_batch_pause: self.category_batch_pause,
            year_file_pause: self.year_file_pause,
            default_page_size: self.default_page_size,
            pinned_month: self.pinned_month.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.retry_base_delay,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        self.to_runtime_config().validate()?;
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "loading.max_attempts",
                self.max_attempts,
                "At least one attempt is required",
            ));
        }
        Ok(())
    }
}
