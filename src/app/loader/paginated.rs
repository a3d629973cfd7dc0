//! Paginated strategy: server pages fetched on demand

use tracing::{debug, info, warn};

use super::{SessionToken, WallpaperStore};
use crate::errors::CatalogResult;

impl WallpaperStore {
    /// Load the series index and its first page
    ///
    /// Daily-feed series are routed to [`WallpaperStore::init_feed_series`].
    /// Re-initialising the current series without `force_refresh` while it
    /// has items is a no-op.
    pub async fn init_series_paginated(
        &self,
        series_id: &str,
        force_refresh: bool,
    ) -> CatalogResult<()> {
        if self.catalog.registry().is_daily(series_id) {
            return self.init_feed_series(series_id, force_refresh).await;
        }
        if self.should_skip_init(series_id, force_refresh).await {
            debug!("{} already loaded, skipping init", series_id);
            return Ok(());
        }

        let token = self.begin_session(series_id).await;
        info!("Initializing {} in paginated mode", series_id);
        let result = self.load_first_page(&token).await;
        self.finish_foreground(&token, result).await
    }

    async fn load_first_page(&self, token: &SessionToken) -> CatalogResult<()> {
        let series_id = token.series_id.as_str();
        let index = self.catalog.load_series_index(series_id).await?;

        if !index.has_pagination() && !index.categories.is_empty() {
            debug!("{} publishes no pages, loading categories instead", series_id);
            return self.load_initial_categories(token, &index).await;
        }

        let first_page = if index.total_pages > 0 {
            Some(self.catalog.load_page(series_id, 1).await?)
        } else {
            None
        };

        self.commit(token, |state| {
            let load = &mut state.load;
            load.expected_total = index.total;
            load.total_pages = index.total_pages;
            load.page_size = index.page_size;
            load.pages_info = index.pages.clone();
            load.current_page = 1;
            if let Some(items) = first_page {
                load.wallpapers = items.to_vec();
                load.loaded_pages.insert(1);
            }
            load.clear_error();
        })
        .await;
        Ok(())
    }

    /// Replace the displayed slice with page `page`
    ///
    /// Returns `Ok(false)` without touching the state when `page` is out of
    /// range or already displayed, or when a later navigation overtook this
    /// one. In filter mode this pages the filtered set.
    pub async fn go_to_page(&self, page: u32) -> CatalogResult<bool> {
        let (token, request) = {
            let mut state = self.state.write().await;
            if state.filter.is_filter_mode {
                drop(state);
                return Ok(self.go_to_filter_page(page).await);
            }
            let load = &state.load;
            if page < 1 || page > load.total_pages || page == load.current_page {
                return Ok(false);
            }
            let Some(token) = state.token() else {
                return Ok(false);
            };
            state.load.loading = true;
            (token, state.next_page_request())
        };

        match self.catalog.load_page(&token.series_id, page).await {
            Ok(items) => {
                let mut shown = false;
                self.commit(&token, |state| {
                    if state.page_request != request {
                        return;
                    }
                    state.load.wallpapers = items.to_vec();
                    state.load.current_page = page;
                    state.load.loaded_pages.insert(page);
                    state.load.loading = false;
                    shown = true;
                })
                .await;
                if !shown {
                    debug!("Page {} superseded by a later navigation", page);
                }
                Ok(shown)
            }
            Err(e) => {
                warn!("Failed to go to page {}: {}", page, e);
                self.commit(&token, |state| {
                    if state.page_request == request {
                        state.load.loading = false;
                    }
                })
                .await;
                Err(e)
            }
        }
    }

    /// Append page `current + 1` to the displayed list
    ///
    /// Returns whether the list advanced; `false` while another load is in
    /// flight or on the last page. In filter mode this appends the next
    /// client-side page.
    pub async fn load_next_page(&self) -> bool {
        let (token, next, request) = {
            let mut state = self.state.write().await;
            if state.filter.is_filter_mode {
                drop(state);
                return self.load_next_filter_page().await;
            }
            if state.load.loading || state.load.current_page >= state.load.total_pages {
                return false;
            }
            let Some(token) = state.token() else {
                return false;
            };
            state.load.loading = true;
            let next = state.load.current_page + 1;
            (token, next, state.next_page_request())
        };

        match self.catalog.load_page(&token.series_id, next).await {
            Ok(items) => {
                let mut advanced = false;
                self.commit(&token, |state| {
                    if state.page_request != request {
                        return;
                    }
                    if state.load.current_page + 1 == next {
                        state.load.wallpapers.extend(items.iter().cloned());
                        state.load.current_page = next;
                        state.load.loaded_pages.insert(next);
                        advanced = true;
                    }
                    state.load.loading = false;
                })
                .await;
                advanced
            }
            Err(e) => {
                warn!("Failed to load next page {}: {}", next, e);
                self.commit(&token, |state| {
                    if state.page_request == request {
                        state.load.loading = false;
                    }
                })
                .await;
                false
            }
        }
    }
}
