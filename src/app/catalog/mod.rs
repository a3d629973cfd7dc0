//! Catalog cache with lazy, memoized loading
//!
//! The catalog sits between the load orchestrator and the transport. Every
//! lookup checks its cache tier first; a miss fetches the file, normalizes
//! encoded payloads, transforms entries into [`WallpaperItem`]s and stores
//! the result permanently. Concurrent misses on the same key are not
//! coalesced; both fetches produce the same value.
//!
//! # Module Organization
//!
//! - [`series`] - Series definitions and file URL layout
//! - [`payload`] - `blob`/`payload` normalization and shape validation
//! - [`store`] - The cache tiers
//! - [`feed`] - Daily-feed dataset assembly
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallpaper_gallery::app::{Catalog, Decoder, Fetcher, HttpTransport, RetryPolicy};
//! use wallpaper_gallery::app::client::ClientConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::from_config(&ClientConfig::default())?);
//! let catalog = Catalog::new(
//!     Fetcher::new(transport, RetryPolicy::default()),
//!     Decoder::inline(),
//! );
//!
//! let index = catalog.load_series_index("desktop").await?;
//! let first_page = catalog.load_page("desktop", 1).await?;
//! println!("{} of {} wallpapers", first_page.len(), index.total);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::client::Fetcher;
use crate::app::decoder::Decoder;
use crate::app::models::{SeriesIndex, WallpaperItem, YearRef};
use crate::app::urls::UrlBuilder;
use crate::constants::{cdn, loading};
use crate::errors::{CatalogError, CatalogResult};

pub mod feed;
pub mod payload;
pub mod series;
pub mod store;

pub use feed::FeedAccumulator;
pub use series::{SeriesConfig, SeriesRegistry};
pub use store::{CacheStats, CatalogCache, ItemList};

/// Catalog endpoints and data source selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Root of the per-series data directories
    pub data_base_url: String,
    pub image_base_url: String,
    pub feed_uhd_base_url: String,
    pub feed_preview_base_url: String,
    /// Version tag appended to every data URL as `?v=`
    pub cache_buster: Option<String>,
    /// Serve relative data paths from this directory instead of the CDN
    pub local_data_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_base_url: cdn::DATA_BASE_URL.to_string(),
            image_base_url: cdn::IMAGE_BASE_URL.to_string(),
            feed_uhd_base_url: cdn::FEED_UHD_BASE_URL.to_string(),
            feed_preview_base_url: cdn::FEED_PREVIEW_BASE_URL.to_string(),
            cache_buster: None,
            local_data_dir: None,
        }
    }
}

impl CatalogConfig {
    pub fn registry(&self) -> SeriesRegistry {
        SeriesRegistry::standard(&self.data_base_url)
    }

    pub fn url_builder(&self) -> UrlBuilder {
        UrlBuilder::new(
            self.image_base_url.as_str(),
            self.feed_uhd_base_url.as_str(),
            self.feed_preview_base_url.as_str(),
        )
    }
}

/// Catalog of all series, backed by the session cache
#[derive(Debug)]
pub struct Catalog {
    fetcher: Fetcher,
    decoder: Decoder,
    registry: SeriesRegistry,
    urls: UrlBuilder,
    cache_buster: Option<String>,
    cache: CatalogCache,
}

impl Catalog {
    /// Catalog over the published series and CDN hosts
    pub fn new(fetcher: Fetcher, decoder: Decoder) -> Self {
        Self::from_config(&CatalogConfig::default(), fetcher, decoder)
    }

    pub fn from_config(config: &CatalogConfig, fetcher: Fetcher, decoder: Decoder) -> Self {
        Self {
            fetcher,
            decoder,
            registry: config.registry(),
            urls: config.url_builder(),
            cache_buster: config.cache_buster.clone().filter(|tag| !tag.is_empty()),
            cache: CatalogCache::new(),
        }
    }

    pub fn registry(&self) -> &SeriesRegistry {
        &self.registry
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    pub fn series(&self, series_id: &str) -> CatalogResult<&SeriesConfig> {
        self.registry.get(series_id)
    }

    fn versioned(&self, url: String) -> String {
        match &self.cache_buster {
            Some(tag) => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{}{}v={}", url, separator, tag)
            }
            None => url,
        }
    }

    /// Fetch a data file and parse its body as JSON
    async fn fetch_json(&self, url: String, context: &str) -> CatalogResult<Value> {
        let url = self.versioned(url);
        let response = self.fetcher.fetch(&url).await?;
        response.json().map_err(|source| CatalogError::Parse {
            context: context.to_string(),
            source,
        })
    }

    async fn fetch_wallpapers(&self, url: String, context: &str) -> CatalogResult<Vec<WallpaperItem>> {
        let data = self.fetch_json(url, context).await?;
        let values =
            payload::item_values(&self.decoder, &data, payload::WALLPAPERS_KEY, context).await?;
        payload::wallpapers(&self.urls, values, context)
    }

    /// Index of `series_id`, fetched once per session
    pub async fn load_series_index(&self, series_id: &str) -> CatalogResult<Arc<SeriesIndex>> {
        if let Some(index) = self.cache.series_index(series_id).await {
            return Ok(index);
        }

        let config = self.registry.get(series_id)?;
        let context = format!("{} index", series_id);
        let data = self.fetch_json(config.index_url(), &context).await?;
        let index = Arc::new(payload::series_index(&self.decoder, series_id, data).await?);

        info!(
            "Loaded {} index: {} wallpapers, {} categories, {} pages",
            series_id,
            index.total,
            index.categories.len(),
            index.total_pages
        );
        self.cache.put_series_index(index.clone()).await;
        Ok(index)
    }

    /// Wallpapers of one category file
    pub async fn load_category(&self, series_id: &str, file: &str) -> CatalogResult<ItemList> {
        if let Some(items) = self.cache.category(series_id, file).await {
            return Ok(items);
        }

        let config = self.registry.get(series_id)?;
        let context = store::category_key(series_id, file);
        let items = Arc::new(self.fetch_wallpapers(config.file_url(file), &context).await?);

        debug!("Loaded {} wallpapers from {}", items.len(), context);
        self.cache.put_category(series_id, file, items.clone()).await;
        Ok(items)
    }

    /// Wallpapers of 1-based page `page`
    pub async fn load_page(&self, series_id: &str, page: u32) -> CatalogResult<ItemList> {
        if let Some(items) = self.cache.page(series_id, page).await {
            return Ok(items);
        }

        let config = self.registry.get(series_id)?;
        let context = store::page_key(series_id, page);
        let items = Arc::new(self.fetch_wallpapers(config.page_url(page), &context).await?);

        debug!("Loaded {} wallpapers for page {}", items.len(), context);
        self.cache.put_page(series_id, page, items.clone()).await;
        Ok(items)
    }

    /// Complete list behind a filter key
    ///
    /// For a daily-feed series the key is a `YYYY-MM` bucket of the feed
    /// dataset, or `all` for the dataset itself. Other series publish one
    /// `<key>.json` file per filter key.
    pub async fn load_filtered_category(&self, series_id: &str, key: &str) -> CatalogResult<ItemList> {
        let config = self.registry.get(series_id)?;
        if config.is_daily && key == loading::FILTER_ALL {
            return self.load_feed_dataset(series_id).await;
        }

        if let Some(items) = self.cache.filter(series_id, key).await {
            return Ok(items);
        }

        let items = if config.is_daily {
            let dataset = self.load_feed_dataset(series_id).await?;
            Arc::new(feed::month_view(&dataset, key))
        } else {
            let context = store::filter_key(series_id, key);
            Arc::new(self.fetch_wallpapers(config.filter_url(key), &context).await?)
        };

        debug!("Filter {}:{} holds {} wallpapers", series_id, key, items.len());
        self.cache.put_filter(series_id, key, items.clone()).await;
        Ok(items)
    }

    /// Items of the daily-feed `latest.json` snapshot; never cached
    pub async fn load_feed_latest(&self, series_id: &str) -> CatalogResult<Vec<WallpaperItem>> {
        let config = self.registry.get(series_id)?;
        let context = format!("{} latest", series_id);
        self.fetch_feed(config.latest_url(), &context).await
    }

    /// Items of one daily-feed year file; never cached
    pub async fn load_feed_year(
        &self,
        series_id: &str,
        year: &YearRef,
    ) -> CatalogResult<Vec<WallpaperItem>> {
        let config = self.registry.get(series_id)?;
        let context = format!("{} year {}", series_id, year.year);
        self.fetch_feed(config.file_url(&year.file), &context).await
    }

    async fn fetch_feed(&self, url: String, context: &str) -> CatalogResult<Vec<WallpaperItem>> {
        let data = self.fetch_json(url, context).await?;
        let values =
            payload::item_values(&self.decoder, &data, payload::FEED_ITEMS_KEY, context).await?;
        payload::feed_wallpapers(&self.urls, values, context)
    }

    /// Complete daily-feed dataset, assembled on first use
    ///
    /// Reads the snapshot then every year file newest first, deduplicating by
    /// date. Snapshot and year failures are logged and skipped; only an index
    /// failure is raised.
    pub async fn load_feed_dataset(&self, series_id: &str) -> CatalogResult<ItemList> {
        if let Some(items) = self.feed_dataset(series_id).await {
            return Ok(items);
        }

        let index = self.load_series_index(series_id).await?;
        let mut acc = FeedAccumulator::new();

        match self.load_feed_latest(series_id).await {
            Ok(items) => {
                acc.extend(items);
            }
            Err(e) => warn!("Failed to load {} latest snapshot: {}", series_id, e),
        }

        for year in feed::years_newest_first(&index.years) {
            match self.load_feed_year(series_id, &year).await {
                Ok(items) => {
                    let added = acc.extend(items);
                    debug!("Year {} added {} feed items", year.year, added);
                }
                Err(e) => warn!("Failed to load year data {}: {}", year.file, e),
            }
        }

        Ok(self.store_feed_dataset(series_id, acc.finish()).await)
    }

    /// Cache a complete feed dataset, sorted newest first
    pub async fn store_feed_dataset(
        &self,
        series_id: &str,
        mut items: Vec<WallpaperItem>,
    ) -> ItemList {
        feed::sort_newest_first(&mut items);
        let items = Arc::new(items);
        info!("Cached {} feed items for {}", items.len(), series_id);
        self.cache.put_feed(series_id, items.clone()).await;
        items
    }

    /// Cached feed dataset, if a non-empty one exists
    pub async fn feed_dataset(&self, series_id: &str) -> Option<ItemList> {
        self.cache
            .feed(series_id)
            .await
            .filter(|items| !items.is_empty())
    }

    /// Drop cached entries for one series, or for all of them
    pub async fn clear_cache(&self, series_id: Option<&str>) {
        self.cache.clear(series_id).await;
    }

    pub async fn stats(&self) -> CacheStats {
        self.cache.stats().await
    }
}
