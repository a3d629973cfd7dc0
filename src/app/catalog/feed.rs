//! Daily-feed dataset assembly

use std::collections::HashSet;

use crate::app::models::{WallpaperItem, YearRef};

/// Collects feed items from several files, keeping the first item per date
#[derive(Debug, Default)]
pub struct FeedAccumulator {
    items: Vec<WallpaperItem>,
    dates: HashSet<String>,
}

impl FeedAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items, skipping dates already present; returns how many were new
    pub fn extend(&mut self, items: impl IntoIterator<Item = WallpaperItem>) -> usize {
        let before = self.items.len();
        for item in items {
            let key = item.date().unwrap_or(&item.id).to_string();
            if self.dates.insert(key) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items sorted newest first
    pub fn finish(mut self) -> Vec<WallpaperItem> {
        sort_newest_first(&mut self.items);
        self.items
    }
}

/// Sort feed items by date descending
pub fn sort_newest_first(items: &mut [WallpaperItem]) {
    items.sort_by(|a, b| b.date().unwrap_or("").cmp(a.date().unwrap_or("")));
}

/// Year files ordered newest first
pub fn years_newest_first(years: &[YearRef]) -> Vec<YearRef> {
    let mut sorted = years.to_vec();
    sorted.sort_by(|a, b| b.year.cmp(&a.year));
    sorted
}

/// Items belonging to the `YYYY-MM` bucket `month`
pub fn month_view(items: &[WallpaperItem], month: &str) -> Vec<WallpaperItem> {
    items
        .iter()
        .filter(|item| item.category == month)
        .cloned()
        .collect()
}
