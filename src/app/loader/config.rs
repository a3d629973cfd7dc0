//! Load orchestrator configuration
//!
//! Batch sizes and pauses for the background refill, plus the clock used to
//! pick the daily feed's default month.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constants::loading;
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for the wallpaper store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Categories loaded in the foreground by the burst strategy
    pub initial_category_count: usize,
    /// Categories fetched concurrently per background batch
    pub category_batch_size: usize,
    /// Pause between background category batches
    #[serde(with = "humantime_serde")]
    pub category_batch_pause: Duration,
    /// Pause between daily-feed year files
    #[serde(with = "humantime_serde")]
    pub year_file_pause: Duration,
    /// Client-side page size for filter mode and the feed month view
    pub default_page_size: usize,
    /// Fixed `YYYY-MM` month for the feed default view; `None` uses the clock
    pub pinned_month: Option<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            initial_category_count: loading::INITIAL_CATEGORY_COUNT,
            category_batch_size: loading::CATEGORY_BATCH_SIZE,
            category_batch_pause: loading::CATEGORY_BATCH_PAUSE,
            year_file_pause: loading::YEAR_FILE_PAUSE,
            default_page_size: loading::DEFAULT_PAGE_SIZE,
            pinned_month: None,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.initial_category_count == 0 {
            return Err(ConfigError::invalid(
                "loading.initial_category_count",
                self.initial_category_count,
                "must be greater than zero",
            ));
        }

        if self.category_batch_size == 0 {
            return Err(ConfigError::invalid(
                "loading.category_batch_size",
                self.category_batch_size,
                "must be greater than zero",
            ));
        }

        if self.default_page_size == 0 {
            return Err(ConfigError::invalid(
                "loading.default_page_size",
                self.default_page_size,
                "must be greater than zero",
            ));
        }

        if let Some(month) = &self.pinned_month {
            if !is_month_key(month) {
                return Err(ConfigError::invalid(
                    "loading.pinned_month",
                    month,
                    "expected YYYY-MM",
                ));
            }
        }

        Ok(())
    }

    /// Categories per background batch, at least one
    pub fn batch_size(&self) -> usize {
        self.category_batch_size.max(1)
    }

    /// Current `YYYY-MM` month
    pub fn current_month(&self) -> String {
        match &self.pinned_month {
            Some(month) => month.clone(),
            None => Local::now().format("%Y-%m").to_string(),
        }
    }
}

fn is_month_key(value: &str) -> bool {
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok()
}

/// Builder for [`LoaderConfig`]
#[derive(Debug, Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_category_count(mut self, count: usize) -> Self {
        self.config.initial_category_count = count;
        self
    }

    pub fn category_batch_size(mut self, size: usize) -> Self {
        self.config.category_batch_size = size;
        self
    }

    pub fn category_batch_pause(mut self, pause: Duration) -> Self {
        self.config.category_batch_pause = pause;
        self
    }

    pub fn year_file_pause(mut self, pause: Duration) -> Self {
        self.config.year_file_pause = pause;
        self
    }

    pub fn default_page_size(mut self, size: usize) -> Self {
        self.config.default_page_size = size;
        self
    }

    /// Pin the feed's default month
    pub fn pinned_month(mut self, month: impl Into<String>) -> Self {
        self.config.pinned_month = Some(month.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> ConfigResult<LoaderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }

    /// Build without validation (for testing)
    pub fn build_unchecked(self) -> LoaderConfig {
        self.config
    }
}
