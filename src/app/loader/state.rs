//! Observable state of the wallpaper store
//!
//! `LoadState` and `FilterState` are what consumers read through
//! [`StoreSnapshot`]. Both live behind one lock together with the session
//! generation, so a continuation can check its token and commit in the same
//! critical section.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use serde_json::Value;

use crate::app::catalog::ItemList;
use crate::app::models::{page_count, page_slice, WallpaperItem};
use crate::errors::{CatalogError, ErrorKind};

/// Loading and pagination state of the current series
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadState {
    /// Items on display, ordered
    pub wallpapers: Vec<WallpaperItem>,
    /// A foreground operation is in flight
    pub loading: bool,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
    pub current_series: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: usize,
    pub is_background_loading: bool,
    /// Total announced by the index, shown while the refill runs
    pub expected_total: usize,
    pub initial_loaded_count: usize,
    /// Per-page metadata from the index
    pub pages_info: Vec<Value>,
    pub loaded_pages: BTreeSet<u32>,
    /// Category files (or feed dates) already merged into `wallpapers`
    pub loaded_categories: HashSet<String>,
}

impl LoadState {
    /// Expected total while the background refill runs, else the actual count
    pub fn display_total(&self) -> usize {
        if self.is_background_loading && self.expected_total > 0 {
            self.expected_total
        } else {
            self.wallpapers.len()
        }
    }

    pub fn has_prev_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page <= 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }

    /// Record a foreground failure; the displayed list is cleared
    pub(crate) fn fail(&mut self, error: &CatalogError, context: &str) {
        let kind = error.kind();
        self.wallpapers.clear();
        self.error_kind = Some(kind);
        self.error = Some(match kind {
            ErrorKind::Unknown => format!("{} ({})", error, context),
            _ => kind.user_message(context),
        });
        self.loading = false;
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
        self.error_kind = None;
    }
}

/// Client-side filter mode over an alternate item set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub is_filter_mode: bool,
    pub current_filter_key: Option<String>,
    pub all_filtered_items: ItemList,
}

/// Everything guarded by the store lock
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub load: LoadState,
    pub filter: FilterState,
    pub generation: u64,
    /// Latest page navigation issued within the session
    pub page_request: u64,
}

impl StoreState {
    /// Start a new session for `series_id`, discarding all previous state
    pub fn begin_session(&mut self, series_id: &str, page_size: usize) -> SessionToken {
        self.generation += 1;
        self.load = LoadState {
            loading: true,
            current_series: Some(series_id.to_string()),
            current_page: 1,
            page_size,
            ..LoadState::default()
        };
        self.filter = FilterState::default();
        SessionToken {
            series_id: series_id.to_string(),
            generation: self.generation,
        }
    }

    pub fn is_current(&self, token: &SessionToken) -> bool {
        self.generation == token.generation
    }

    /// Register a page navigation; only the newest one may commit
    pub fn next_page_request(&mut self) -> u64 {
        self.page_request += 1;
        self.page_request
    }

    /// Token of the running session, if a series is loaded
    pub fn token(&self) -> Option<SessionToken> {
        self.load.current_series.as_ref().map(|series_id| SessionToken {
            series_id: series_id.clone(),
            generation: self.generation,
        })
    }

    /// Enter filter mode over `items`, showing the first client page
    pub fn enter_filter_mode(&mut self, key: &str, items: ItemList, page_size: usize) {
        self.load.page_size = page_size;
        self.load.current_page = 1;
        self.load.expected_total = items.len();
        self.load.total_pages = page_count(items.len(), page_size);
        self.load.loaded_pages = BTreeSet::from([1]);
        self.load.wallpapers = page_slice(&items, 1, page_size).to_vec();

        self.filter = FilterState {
            is_filter_mode: true,
            current_filter_key: Some(key.to_string()),
            all_filtered_items: items,
        };
    }

    /// Client page `page` of the filtered set
    pub fn filter_page(&self, page: u32) -> Vec<WallpaperItem> {
        page_slice(&self.filter.all_filtered_items, page, self.load.page_size).to_vec()
    }
}

/// Identity of one load session
///
/// Continuations hold a token and commit only while its generation is still
/// the store's current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub series_id: String,
    pub generation: u64,
}

/// Point-in-time copy of the store state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub load: LoadState,
    pub filter: FilterState,
}

impl StoreSnapshot {
    pub(crate) fn of(state: &StoreState) -> Self {
        Self {
            load: state.load.clone(),
            filter: state.filter.clone(),
        }
    }

    pub fn wallpapers(&self) -> &[WallpaperItem] {
        &self.load.wallpapers
    }

    pub fn display_total(&self) -> usize {
        self.load.display_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FetchError;
    use std::sync::Arc;

    fn items(n: usize) -> ItemList {
        let urls = crate::app::urls::UrlBuilder::default();
        Arc::new(
            (0..n)
                .map(|i| {
                    urls.wallpaper(crate::app::models::RawWallpaper {
                        filename: Some(format!("{}.jpg", i)),
                        ..Default::default()
                    })
                    .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_session_generations() {
        let mut state = StoreState::default();
        let first = state.begin_session("desktop", 30);
        assert!(state.is_current(&first));
        assert!(state.load.loading);

        let second = state.begin_session("mobile", 30);
        assert!(!state.is_current(&first));
        assert!(state.is_current(&second));
        assert_eq!(state.token(), Some(second));
    }

    #[test]
    fn test_filter_mode_paging() {
        let mut state = StoreState::default();
        state.begin_session("desktop", 30);
        state.enter_filter_mode("nature", items(65), 30);

        assert_eq!(state.load.total_pages, 3);
        assert_eq!(state.load.wallpapers.len(), 30);
        assert_eq!(state.filter_page(2)[0].id, "30.jpg");
        assert_eq!(state.filter_page(3).len(), 5);
        assert!(state.filter.is_filter_mode);
    }

    #[test]
    fn test_display_total_and_flags() {
        let mut load = LoadState {
            expected_total: 100,
            is_background_loading: true,
            current_page: 1,
            total_pages: 2,
            ..LoadState::default()
        };
        assert_eq!(load.display_total(), 100);
        assert!(load.is_first_page() && load.has_next_page() && !load.has_prev_page());

        load.is_background_loading = false;
        assert_eq!(load.display_total(), 0);
        load.current_page = 2;
        assert!(load.is_last_page() && !load.has_next_page());
    }

    #[test]
    fn test_failure_clears_list() {
        let mut load = LoadState::default();
        load.wallpapers = items(2).to_vec();
        let error = CatalogError::Fetch(FetchError::HttpStatus {
            url: "u".to_string(),
            status: 503,
        });

        load.fail(&error, "series: desktop");

        assert!(load.wallpapers.is_empty());
        assert_eq!(load.error_kind, Some(ErrorKind::Network));
        assert!(load.error.as_deref().unwrap().contains("series: desktop"));
    }
}
