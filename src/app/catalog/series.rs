//! Series definitions and data URL layout

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{cdn, series};
use crate::errors::{CatalogError, CatalogResult};

/// Where a series publishes its catalog files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub id: String,
    pub name: String,
    /// Directory holding `index.json`, category, page and filter files
    pub data_url: String,
    /// Daily-feed series: year files plus a `latest.json` snapshot
    #[serde(default)]
    pub is_daily: bool,
}

impl SeriesConfig {
    pub fn new(id: &str, name: &str, data_base_url: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            data_url: format!("{}/{}", data_base_url.trim_end_matches('/'), id),
            is_daily: false,
        }
    }

    pub fn daily(mut self) -> Self {
        self.is_daily = true;
        self
    }

    /// URL of a file inside the series directory
    pub fn file_url(&self, file: &str) -> String {
        format!("{}/{}", self.data_url, file.trim_start_matches('/'))
    }

    pub fn index_url(&self) -> String {
        self.file_url(cdn::INDEX_FILE)
    }

    pub fn page_url(&self, page: u32) -> String {
        self.file_url(&format!("page-{}.json", page))
    }

    pub fn filter_url(&self, key: &str) -> String {
        self.file_url(&format!("{}.json", key))
    }

    pub fn latest_url(&self) -> String {
        self.file_url(cdn::LATEST_FILE)
    }
}

/// Known series, keyed by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRegistry {
    series: BTreeMap<String, SeriesConfig>,
}

impl Default for SeriesRegistry {
    fn default() -> Self {
        Self::standard(cdn::DATA_BASE_URL)
    }
}

impl SeriesRegistry {
    pub fn empty() -> Self {
        Self {
            series: BTreeMap::new(),
        }
    }

    /// The four published series rooted at `data_base_url`
    pub fn standard(data_base_url: &str) -> Self {
        let mut registry = Self::empty();
        registry.register(SeriesConfig::new(series::DESKTOP, "Desktop", data_base_url));
        registry.register(SeriesConfig::new(series::MOBILE, "Mobile", data_base_url));
        registry.register(SeriesConfig::new(series::AVATAR, "Avatar", data_base_url));
        registry.register(SeriesConfig::new(series::BING, "Bing Daily", data_base_url).daily());
        registry
    }

    pub fn register(&mut self, config: SeriesConfig) {
        self.series.insert(config.id.clone(), config);
    }

    pub fn get(&self, series_id: &str) -> CatalogResult<&SeriesConfig> {
        self.series
            .get(series_id)
            .ok_or_else(|| CatalogError::UnknownSeries {
                series_id: series_id.to_string(),
            })
    }

    pub fn is_daily(&self, series_id: &str) -> bool {
        self.series
            .get(series_id)
            .map(|config| config.is_daily)
            .unwrap_or(false)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}
