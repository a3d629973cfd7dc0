//! Filter mode: client-side pagination over a complete item set

use std::sync::Arc;

use tracing::{error, info};

use super::state::FilterState;
use super::WallpaperStore;
use crate::app::catalog::feed::month_view;
use crate::errors::CatalogResult;

impl WallpaperStore {
    /// Show the complete list behind `key`, paged client-side
    ///
    /// A `page_size` of zero uses the configured default. On failure the
    /// error is recorded and the current view is kept.
    pub async fn switch_to_filter_mode(&self, key: &str, page_size: usize) -> CatalogResult<()> {
        let token = self.current_token().await?;
        let page_size = if page_size == 0 {
            self.config.default_page_size
        } else {
            page_size
        };

        self.commit(&token, |state| state.load.loading = true).await;

        match self
            .catalog
            .load_filtered_category(&token.series_id, key)
            .await
        {
            Ok(items) => {
                let count = items.len();
                if self
                    .commit(&token, |state| {
                        state.enter_filter_mode(key, items, page_size);
                        state.load.loading = false;
                        state.load.clear_error();
                    })
                    .await
                {
                    info!("Filter {} on {}: {} wallpapers", key, token.series_id, count);
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to switch {} to filter {}: {}", token.series_id, key, e);
                let applied = self
                    .commit(&token, |state| {
                        state.load.loading = false;
                        state.load.error = Some(format!("Failed to load category \"{}\"", key));
                        state.load.error_kind = Some(e.kind());
                    })
                    .await;
                if applied {
                    Err(e)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Leave filter mode
    ///
    /// A daily feed with a cached dataset returns to the current month view;
    /// every other series reloads its first page.
    pub async fn exit_filter_mode(&self) -> CatalogResult<()> {
        let token = {
            let state = self.state.read().await;
            if !state.filter.is_filter_mode {
                return Ok(());
            }
            match state.token() {
                Some(token) => token,
                None => return Ok(()),
            }
        };
        let series_id = token.series_id.clone();

        if self.catalog.registry().is_daily(&series_id) {
            if let Some(dataset) = self.catalog.feed_dataset(&series_id).await {
                let month = self.config.current_month();
                let page_size = self.config.default_page_size;
                self.commit(&token, |state| {
                    let view = Arc::new(month_view(&dataset, &month));
                    state.enter_filter_mode(&month, view, page_size);
                })
                .await;
                return Ok(());
            }
        }

        self.commit(&token, |state| state.filter = FilterState::default())
            .await;
        self.init_series_paginated(&series_id, true).await
    }

    /// Show client page `page` of the filtered set
    ///
    /// No-op outside filter mode or when `page` is out of range.
    pub async fn go_to_filter_page(&self, page: u32) -> bool {
        let mut state = self.state.write().await;
        if !state.filter.is_filter_mode || page < 1 || page > state.load.total_pages {
            return false;
        }
        let items = state.filter_page(page);
        state.load.wallpapers = items;
        state.load.current_page = page;
        state.load.loaded_pages.insert(page);
        true
    }

    /// Append the next client page of the filtered set
    pub async fn load_next_filter_page(&self) -> bool {
        let mut state = self.state.write().await;
        if !state.filter.is_filter_mode || state.load.current_page >= state.load.total_pages {
            return false;
        }
        let next = state.load.current_page + 1;
        let page = state.filter_page(next);
        state.load.wallpapers.extend(page);
        state.load.current_page = next;
        state.load.loaded_pages.insert(next);
        true
    }
}
