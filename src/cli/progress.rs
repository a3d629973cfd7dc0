//! Progress display for background refills
//!
//! While the store fills the remaining categories or year files in the
//! background, a spinner shows how many wallpapers are on display against
//! the total the index announced.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::app::{StoreSnapshot, WallpaperStore};

/// Configuration for the refill spinner
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Draw the spinner at all
    pub enabled: bool,
    /// How often the message is refreshed
    pub update_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            update_interval: Duration::from_millis(120),
        }
    }
}

/// Spinner following a store until its background work settles
#[derive(Debug)]
pub struct RefillProgress {
    config: ProgressConfig,
    spinner: ProgressBar,
}

impl RefillProgress {
    pub fn new(config: ProgressConfig) -> Self {
        let spinner = if config.enabled {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["◐", "◓", "◑", "◒"]);
        spinner.set_style(style);

        Self { config, spinner }
    }

    /// Wait for `store`'s background refill, refreshing the spinner meanwhile
    ///
    /// Returns the snapshot taken once everything has settled.
    pub async fn track(&self, store: &WallpaperStore, label: &str) -> StoreSnapshot {
        let initial = store.snapshot().await;
        if !initial.load.is_background_loading {
            return initial;
        }

        self.spinner.set_message(status_message(label, &initial));
        self.spinner.enable_steady_tick(self.config.update_interval);

        let settled = store.wait_for_background();
        tokio::pin!(settled);
        let mut ticker = tokio::time::interval(self.config.update_interval);

        loop {
            tokio::select! {
                _ = &mut settled => break,
                _ = ticker.tick() => {
                    let snapshot = store.snapshot().await;
                    self.spinner.set_message(status_message(label, &snapshot));
                }
            }
        }

        self.spinner.finish_and_clear();
        let snapshot = store.snapshot().await;
        debug!(
            "Background refill of {} settled with {} wallpapers",
            label,
            snapshot.wallpapers().len()
        );
        snapshot
    }
}

/// Spinner text for a snapshot, e.g. `Loading mobile: 6 of 14 wallpapers`
pub fn status_message(label: &str, snapshot: &StoreSnapshot) -> String {
    let shown = snapshot.wallpapers().len();
    let total = snapshot.display_total();
    if snapshot.load.is_background_loading && total > shown {
        format!("Loading {}: {} of {} wallpapers", label, shown, total)
    } else {
        format!("Loading {}: {} wallpapers", label, shown)
    }
}
