//! Session-lifetime catalog cache
//!
//! Five independent tiers keyed by string composites. Entries are written
//! once per key and never evicted; only [`CatalogCache::clear`] removes them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::app::models::{SeriesIndex, WallpaperItem};

/// Shared, immutable list of transformed wallpapers
pub type ItemList = Arc<Vec<WallpaperItem>>;

/// Key of a category entry: `series:file`
pub fn category_key(series_id: &str, file: &str) -> String {
    format!("{}:{}", series_id, file)
}

/// Key of a page entry: `series:page`
pub fn page_key(series_id: &str, page: u32) -> String {
    format!("{}:{}", series_id, page)
}

/// Key of a filter entry: `series:filterKey`
pub fn filter_key(series_id: &str, key: &str) -> String {
    format!("{}:{}", series_id, key)
}

/// One keyed cache tier
#[derive(Debug)]
struct Tier<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Tier<V> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn get(&self, key: &str) -> Option<V> {
        let hit = self.entries.read().await.get(key).cloned();
        debug!(
            "{} cache {} for {}",
            self.name,
            if hit.is_some() { "hit" } else { "miss" },
            key
        );
        hit
    }

    async fn insert(&self, key: String, value: V) {
        self.entries.write().await.insert(key, value);
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Drop the series' own entry and every `series:` composite
    async fn clear_series(&self, series_id: &str) -> usize {
        let prefix = format!("{}:", series_id);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| key != series_id && !key.starts_with(&prefix));
        before - entries.len()
    }

    async fn clear(&self) -> usize {
        let mut entries = self.entries.write().await;
        let removed = entries.len();
        entries.clear();
        removed
    }
}

/// Number of entries per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub series_indexes: usize,
    pub categories: usize,
    pub pages: usize,
    pub filters: usize,
    pub feed_datasets: usize,
}

impl CacheStats {
    pub fn total_entries(&self) -> usize {
        self.series_indexes + self.categories + self.pages + self.filters + self.feed_datasets
    }
}

/// Catalog cache store
#[derive(Debug)]
pub struct CatalogCache {
    series_index: Tier<Arc<SeriesIndex>>,
    category: Tier<ItemList>,
    page: Tier<ItemList>,
    filter: Tier<ItemList>,
    feed: Tier<ItemList>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub fn new() -> Self {
        Self {
            series_index: Tier::new("series index"),
            category: Tier::new("category"),
            page: Tier::new("page"),
            filter: Tier::new("filter"),
            feed: Tier::new("feed"),
        }
    }

    pub async fn series_index(&self, series_id: &str) -> Option<Arc<SeriesIndex>> {
        self.series_index.get(series_id).await
    }

    pub async fn put_series_index(&self, index: Arc<SeriesIndex>) {
        self.series_index
            .insert(index.series_id.clone(), index)
            .await;
    }

    pub async fn category(&self, series_id: &str, file: &str) -> Option<ItemList> {
        self.category.get(&category_key(series_id, file)).await
    }

    pub async fn put_category(&self, series_id: &str, file: &str, items: ItemList) {
        self.category
            .insert(category_key(series_id, file), items)
            .await;
    }

    pub async fn page(&self, series_id: &str, page: u32) -> Option<ItemList> {
        self.page.get(&page_key(series_id, page)).await
    }

    pub async fn put_page(&self, series_id: &str, page: u32, items: ItemList) {
        self.page.insert(page_key(series_id, page), items).await;
    }

    pub async fn filter(&self, series_id: &str, key: &str) -> Option<ItemList> {
        self.filter.get(&filter_key(series_id, key)).await
    }

    pub async fn put_filter(&self, series_id: &str, key: &str, items: ItemList) {
        self.filter.insert(filter_key(series_id, key), items).await;
    }

    /// Complete daily-feed dataset of a series
    pub async fn feed(&self, series_id: &str) -> Option<ItemList> {
        self.feed.get(series_id).await
    }

    pub async fn put_feed(&self, series_id: &str, items: ItemList) {
        self.feed.insert(series_id.to_string(), items).await;
    }

    /// Clear one series from every tier, or everything when `None`
    pub async fn clear(&self, series_id: Option<&str>) {
        let removed = match series_id {
            Some(id) => {
                self.series_index.clear_series(id).await
                    + self.category.clear_series(id).await
                    + self.page.clear_series(id).await
                    + self.filter.clear_series(id).await
                    + self.feed.clear_series(id).await
            }
            None => {
                self.series_index.clear().await
                    + self.category.clear().await
                    + self.page.clear().await
                    + self.filter.clear().await
                    + self.feed.clear().await
            }
        };
        debug!(
            "Cleared {} cache entries for {}",
            removed,
            series_id.unwrap_or("all series")
        );
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            series_indexes: self.series_index.len().await,
            categories: self.category.len().await,
            pages: self.page.len().await,
            filters: self.filter.len().await,
            feed_datasets: self.feed.len().await,
        }
    }
}
