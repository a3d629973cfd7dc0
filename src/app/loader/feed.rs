//! Daily-feed strategy
//!
//! The `latest` snapshot is shown immediately, filtered to the current month.
//! Year files are then read newest first in the background; once all of them
//! have settled the complete dataset is cached and the month view rebuilt.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::state::StoreState;
use super::{SessionToken, WallpaperStore};
use crate::app::catalog::feed::{month_view, years_newest_first};
use crate::app::catalog::FeedAccumulator;
use crate::app::models::{WallpaperItem, YearRef};
use crate::errors::CatalogResult;

impl WallpaperStore {
    /// Load a daily-feed series, defaulting to the current month
    pub async fn init_feed_series(&self, series_id: &str, force_refresh: bool) -> CatalogResult<()> {
        if self.should_skip_init(series_id, force_refresh).await {
            debug!("{} already loaded, skipping init", series_id);
            return Ok(());
        }

        let token = self.begin_session(series_id).await;
        let month = self.config.current_month();
        info!("Initializing daily feed {} at {}", series_id, month);

        self.commit(&token, |state| {
            state.filter.is_filter_mode = true;
            state.filter.current_filter_key = Some(month.clone());
        })
        .await;

        let result = self.load_feed_snapshot(&token, &month).await;
        self.finish_foreground(&token, result).await
    }

    /// Show the month view over `items`
    fn show_month(&self, state: &mut StoreState, month: &str, items: &[WallpaperItem]) {
        let view = Arc::new(month_view(items, month));
        state.enter_filter_mode(month, view, self.config.default_page_size);
    }

    async fn load_feed_snapshot(&self, token: &SessionToken, month: &str) -> CatalogResult<()> {
        let series_id = token.series_id.as_str();
        let index = self.catalog.load_series_index(series_id).await?;

        let latest = match self.catalog.load_feed_latest(series_id).await {
            Ok(items) => items,
            Err(e) => {
                warn!(
                    "Failed to load {} latest snapshot, waiting for year files: {}",
                    series_id, e
                );
                Vec::new()
            }
        };

        let has_years = !index.years.is_empty();
        let committed = self
            .commit(token, |state| {
                self.show_month(state, month, &latest);
                let load = &mut state.load;
                load.loaded_categories = latest
                    .iter()
                    .filter_map(|item| item.date().map(str::to_string))
                    .collect();
                load.initial_loaded_count = load.wallpapers.len();
                if latest.is_empty() {
                    load.expected_total = index.total;
                }
                load.is_background_loading = has_years;
                load.clear_error();
            })
            .await;

        if !committed {
            return Ok(());
        }

        if has_years {
            let store = self.clone();
            let task_token = token.clone();
            let month = month.to_string();
            let years = index.years.clone();
            self.spawn_background(token, async move {
                store.refill_feed(task_token, month, latest, years).await;
            });
        } else {
            self.catalog.store_feed_dataset(series_id, latest).await;
        }
        Ok(())
    }

    /// Read every year file, then cache the dataset and rebuild the month view
    async fn refill_feed(
        &self,
        token: SessionToken,
        month: String,
        seed: Vec<WallpaperItem>,
        years: Vec<YearRef>,
    ) {
        let series_id = token.series_id.as_str();
        let mut acc = FeedAccumulator::new();
        acc.extend(seed);

        for (i, year) in years_newest_first(&years).iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.year_file_pause).await;
            }
            if !self.is_current(&token).await {
                debug!("Series switched, abandoning {} feed refill", series_id);
                return;
            }

            match self.catalog.load_feed_year(series_id, year).await {
                Ok(items) => {
                    let added = acc.extend(items);
                    debug!("{} year {}: {} new items", series_id, year.year, added);
                }
                Err(e) => warn!("Failed to load year data {}: {}", year.file, e),
            }
        }

        if !self.is_current(&token).await {
            debug!("Series switched, dropping {} feed dataset", series_id);
            return;
        }

        let dataset = self.catalog.store_feed_dataset(series_id, acc.finish()).await;
        let committed = self
            .commit(&token, |state| {
                // A filter picked by the user meanwhile stays in place
                if state.filter.current_filter_key.as_deref() == Some(month.as_str()) {
                    self.show_month(state, &month, &dataset);
                }
                let load = &mut state.load;
                load.loaded_categories = dataset
                    .iter()
                    .filter_map(|item| item.date().map(str::to_string))
                    .collect();
                load.initial_loaded_count = dataset.len();
                load.is_background_loading = false;
            })
            .await;

        if committed {
            info!("Daily feed {} complete: {} items", series_id, dataset.len());
        }
    }
}
