//! Load orchestrator for the wallpaper browser
//!
//! [`WallpaperStore`] owns the observable [`LoadState`] and [`FilterState`]
//! and drives the three loading strategies against the [`Catalog`]:
//!
//! - `paginated` - index, then one server page at a time
//! - `burst` - first categories in the foreground, the rest in one silent
//!   background refill that is committed in a single append
//! - `feed` - daily feed: snapshot first, year files in the background, the
//!   current month as the default view
//! - `filter` - client-side pagination over an alternate item set
//!
//! Every init starts a new session. Continuations carry the session's
//! [`SessionToken`] and commit only if it is still current, checked under the
//! same lock that applies the update, so a series switch turns every pending
//! continuation of the previous session into a no-op.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::app::catalog::{CacheStats, Catalog};
use crate::app::models::{Statistics, WallpaperItem};
use crate::errors::{CatalogError, CatalogResult};

mod burst;
pub mod config;
mod feed;
mod filter;
mod paginated;
pub mod state;

#[cfg(test)]
mod tests;

pub use config::{LoaderConfig, LoaderConfigBuilder};
pub use state::{FilterState, LoadState, SessionToken, StoreSnapshot};

use state::StoreState;

/// Explicit store object holding the browsing session
#[derive(Debug, Clone)]
pub struct WallpaperStore {
    catalog: Arc<Catalog>,
    config: Arc<LoaderConfig>,
    state: Arc<RwLock<StoreState>>,
    background: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl WallpaperStore {
    pub fn new(catalog: Arc<Catalog>, config: LoaderConfig) -> Self {
        Self {
            catalog,
            config: Arc::new(config),
            state: Arc::new(RwLock::new(StoreState::default())),
            background: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    async fn begin_session(&self, series_id: &str) -> SessionToken {
        let mut state = self.state.write().await;
        let token = state.begin_session(series_id, self.config.default_page_size);
        debug!(
            "Session {} started for {}",
            token.generation, token.series_id
        );
        token
    }

    async fn is_current(&self, token: &SessionToken) -> bool {
        self.state.read().await.is_current(token)
    }

    async fn current_token(&self) -> CatalogResult<SessionToken> {
        self.state
            .read()
            .await
            .token()
            .ok_or(CatalogError::NoActiveSeries)
    }

    /// Apply `update` if `token` is still current; returns whether it was applied
    async fn commit<F>(&self, token: &SessionToken, update: F) -> bool
    where
        F: FnOnce(&mut StoreState),
    {
        let mut state = self.state.write().await;
        if !state.is_current(token) {
            debug!(
                "Discarding stale update for {} (session {})",
                token.series_id, token.generation
            );
            return false;
        }
        update(&mut state);
        true
    }

    /// Whether an init for `series_id` would reload what is already shown
    async fn should_skip_init(&self, series_id: &str, force_refresh: bool) -> bool {
        let state = self.state.read().await;
        !force_refresh
            && state.load.current_series.as_deref() == Some(series_id)
            && !state.load.wallpapers.is_empty()
    }

    /// Settle a foreground operation, recording a failure in the state
    async fn finish_foreground(
        &self,
        token: &SessionToken,
        result: CatalogResult<()>,
    ) -> CatalogResult<()> {
        let context = format!("series: {}", token.series_id);
        match result {
            Ok(()) => {
                self.commit(token, |state| state.load.loading = false).await;
                Ok(())
            }
            Err(e) => {
                let applied = self.commit(token, |state| state.load.fail(&e, &context)).await;
                if applied {
                    error!("Failed to init series {}: {}", token.series_id, e);
                    Err(e)
                } else {
                    debug!("Dropping error of superseded session: {}", e);
                    Ok(())
                }
            }
        }
    }

    /// Run a refill of `token`'s session in the background
    ///
    /// A refill that panics still clears the background flag of its session.
    fn spawn_background<F>(&self, token: &SessionToken, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let store = self.clone();
        let token = token.clone();
        let handle = tokio::spawn(async move {
            if AssertUnwindSafe(task).catch_unwind().await.is_err() {
                error!("Background refill of {} panicked", token.series_id);
                store
                    .commit(&token, |state| {
                        state.load.is_background_loading = false;
                        state.load.initial_loaded_count = state.load.wallpapers.len();
                    })
                    .await;
            }
        });
        let mut tasks = self.background.lock().unwrap_or_else(|e| e.into_inner());
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Wait until every background refill spawned so far has finished
    pub async fn wait_for_background(&self) {
        loop {
            let tasks: Vec<JoinHandle<()>> = {
                let mut tasks = self.background.lock().unwrap_or_else(|e| e.into_inner());
                tasks.drain(..).collect()
            };
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(e) = task.await {
                    warn!("Background refill ended abnormally: {}", e);
                }
            }
        }
    }

    /// Point-in-time copy of the load and filter state
    pub async fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::of(&*self.state.read().await)
    }

    pub async fn display_total(&self) -> usize {
        self.state.read().await.load.display_total()
    }

    /// Figures over the wallpapers on display
    pub async fn statistics(&self) -> Statistics {
        Statistics::from_items(&self.state.read().await.load.wallpapers)
    }

    pub async fn has_prev_page(&self) -> bool {
        self.state.read().await.load.has_prev_page()
    }

    pub async fn has_next_page(&self) -> bool {
        self.state.read().await.load.has_next_page()
    }

    pub async fn is_first_page(&self) -> bool {
        self.state.read().await.load.is_first_page()
    }

    pub async fn is_last_page(&self) -> bool {
        self.state.read().await.load.is_last_page()
    }

    pub async fn wallpaper_by_id(&self, id: &str) -> Option<WallpaperItem> {
        let state = self.state.read().await;
        state.load.wallpapers.iter().find(|w| w.id == id).cloned()
    }

    /// Position of `id` in the displayed list
    pub async fn wallpaper_index(&self, id: &str) -> Option<usize> {
        let state = self.state.read().await;
        state.load.wallpapers.iter().position(|w| w.id == id)
    }

    pub async fn prev_wallpaper(&self, id: &str) -> Option<WallpaperItem> {
        let state = self.state.read().await;
        let wallpapers = &state.load.wallpapers;
        let index = wallpapers.iter().position(|w| w.id == id)?;
        index.checked_sub(1).map(|prev| wallpapers[prev].clone())
    }

    pub async fn next_wallpaper(&self, id: &str) -> Option<WallpaperItem> {
        let state = self.state.read().await;
        let wallpapers = &state.load.wallpapers;
        let index = wallpapers.iter().position(|w| w.id == id)?;
        wallpapers.get(index + 1).cloned()
    }

    /// Clear catalog caches for one series or all; the displayed state is kept
    pub async fn clear_cache(&self, series_id: Option<&str>) {
        self.catalog.clear_cache(series_id).await;
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.catalog.stats().await
    }
}
