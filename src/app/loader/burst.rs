//! Category-burst strategy
//!
//! The first categories are fetched concurrently and displayed at once; the
//! remainder is fetched in background batches and appended in one step when
//! every batch has settled, so the displayed count never creeps upward.

use futures::future::{join_all, try_join_all};
use tracing::{debug, info, warn};

use super::{SessionToken, WallpaperStore};
use crate::app::catalog::ItemList;
use crate::app::models::{CategoryRef, SeriesIndex};
use crate::errors::CatalogResult;

/// Categories fetched by one batch, in index order
type CategoryResults = Vec<(CategoryRef, CatalogResult<ItemList>)>;

impl WallpaperStore {
    /// Load a series category by category
    ///
    /// Daily-feed series are routed to [`WallpaperStore::init_feed_series`].
    pub async fn init_series(&self, series_id: &str, force_refresh: bool) -> CatalogResult<()> {
        if self.catalog.registry().is_daily(series_id) {
            return self.init_feed_series(series_id, force_refresh).await;
        }
        if self.should_skip_init(series_id, force_refresh).await {
            debug!("{} already loaded, skipping init", series_id);
            return Ok(());
        }

        let token = self.begin_session(series_id).await;
        info!("Initializing {} with category burst", series_id);
        let result = match self.catalog.load_series_index(series_id).await {
            Ok(index) => self.load_initial_categories(&token, &index).await,
            Err(e) => Err(e),
        };
        self.finish_foreground(&token, result).await
    }

    async fn fetch_batch(&self, series_id: &str, batch: &[CategoryRef]) -> CategoryResults {
        let results = join_all(
            batch
                .iter()
                .map(|category| self.catalog.load_category(series_id, &category.file)),
        )
        .await;
        batch.iter().cloned().zip(results).collect()
    }

    /// Display the first categories and schedule the rest
    pub(super) async fn load_initial_categories(
        &self,
        token: &SessionToken,
        index: &SeriesIndex,
    ) -> CatalogResult<()> {
        let series_id = token.series_id.as_str();
        let count = self
            .config
            .initial_category_count
            .min(index.categories.len());
        let (initial, remaining) = index.categories.split_at(count);

        let lists = try_join_all(
            initial
                .iter()
                .map(|category| self.catalog.load_category(series_id, &category.file)),
        )
        .await?;

        let has_remaining = !remaining.is_empty();
        let committed = self
            .commit(token, |state| {
                let load = &mut state.load;
                load.wallpapers = lists.iter().flat_map(|items| items.iter().cloned()).collect();
                load.loaded_categories = initial.iter().map(|c| c.file.clone()).collect();
                load.initial_loaded_count = load.wallpapers.len();
                load.expected_total = if has_remaining {
                    index.total
                } else {
                    load.wallpapers.len()
                };
                load.current_page = 1;
                load.total_pages = 1;
                load.is_background_loading = has_remaining;
                load.clear_error();
            })
            .await;

        if committed && has_remaining {
            debug!(
                "{}: {} categories shown, {} left for background refill",
                series_id,
                initial.len(),
                remaining.len()
            );
            let store = self.clone();
            let task_token = token.clone();
            let remaining = remaining.to_vec();
            self.spawn_background(token, async move {
                store.refill_categories(task_token, remaining).await;
            });
        }
        Ok(())
    }

    /// Fetch `categories` batch by batch, then append everything at once
    async fn refill_categories(&self, token: SessionToken, categories: Vec<CategoryRef>) {
        let series_id = token.series_id.as_str();
        let mut collected = Vec::new();

        for (i, batch) in categories.chunks(self.config.batch_size()).enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.category_batch_pause).await;
            }
            if !self.is_current(&token).await {
                debug!("Series switched, abandoning {} refill", series_id);
                return;
            }

            for (category, result) in self.fetch_batch(series_id, batch).await {
                match result {
                    Ok(items) => collected.push((category.file, items)),
                    Err(e) => warn!(
                        "Background load of {} category {} failed: {}",
                        series_id, category.file, e
                    ),
                }
            }
        }

        let merged = collected.len();
        let committed = self
            .commit(&token, |state| {
                let filter_mode = state.filter.is_filter_mode;
                let load = &mut state.load;
                for (file, items) in collected {
                    if load.loaded_categories.insert(file) && !filter_mode {
                        load.wallpapers.extend(items.iter().cloned());
                    }
                }
                load.initial_loaded_count = load.wallpapers.len();
                load.is_background_loading = false;
            })
            .await;

        if committed {
            info!(
                "Background refill of {} merged {} of {} categories",
                series_id,
                merged,
                categories.len()
            );
        }
    }

    /// Load every category of `series_id` not yet displayed
    ///
    /// Appends batch by batch and returns the number of categories merged.
    /// In filter mode the categories are recorded but the filtered view is
    /// left alone. When `series_id` is not the current series only its index
    /// is warmed.
    pub async fn load_all_categories(&self, series_id: &str) -> CatalogResult<usize> {
        let index = self.catalog.load_series_index(series_id).await?;

        let (token, pending) = {
            let mut state = self.state.write().await;
            let token = match state.token() {
                Some(token) if token.series_id == series_id => token,
                _ => return Ok(0),
            };
            let pending: Vec<CategoryRef> = index
                .categories
                .iter()
                .filter(|c| !state.load.loaded_categories.contains(&c.file))
                .cloned()
                .collect();
            if pending.is_empty() {
                return Ok(0);
            }
            state.load.loading = true;
            (token, pending)
        };

        let mut merged = 0;
        for (i, batch) in pending.chunks(self.config.batch_size()).enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.category_batch_pause).await;
            }
            let results = self.fetch_batch(series_id, batch).await;
            let applied = self
                .commit(&token, |state| {
                    let filter_mode = state.filter.is_filter_mode;
                    let load = &mut state.load;
                    for (category, result) in results {
                        match result {
                            Ok(items) => {
                                if load.loaded_categories.insert(category.file) {
                                    if !filter_mode {
                                        load.wallpapers.extend(items.iter().cloned());
                                    }
                                    merged += 1;
                                }
                            }
                            Err(e) => warn!("Failed to load category {}: {}", category.file, e),
                        }
                    }
                })
                .await;
            if !applied {
                debug!("Series switched, stopping category load of {}", series_id);
                return Ok(merged);
            }
        }

        self.commit(&token, |state| {
            state.load.loading = false;
            state.load.is_background_loading = false;
            if !state.filter.is_filter_mode {
                state.load.initial_loaded_count = state.load.wallpapers.len();
            }
        })
        .await;
        Ok(merged)
    }
}
