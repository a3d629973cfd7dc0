//! Data models for the wallpaper catalog
//!
//! Wire structures mirror the JSON published on the CDN; the transformed
//! [`WallpaperItem`] is what the loader exposes to consumers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::loading;

/// Reference to a category file inside a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// File name relative to the series data directory
    pub file: String,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// Reference to one year file of the daily feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRef {
    pub year: i32,
    pub file: String,
}

/// Index of a series, immutable once fetched
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesIndex {
    pub series_id: String,
    pub series_name: Option<String>,
    /// Total number of wallpapers declared by the index
    pub total: usize,
    pub category_count: Option<usize>,
    pub categories: Vec<CategoryRef>,
    pub page_size: usize,
    pub total_pages: u32,
    /// Opaque per-page metadata, passed through to consumers
    pub pages: Vec<Value>,
    pub years: Vec<YearRef>,
    pub generated_at: Option<String>,
    pub schema: Option<u64>,
}

impl SeriesIndex {
    pub fn has_pagination(&self) -> bool {
        self.total_pages > 0
    }
}

/// Resolution with a display label and a UI tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub tier: String,
}

const RESOLUTION_THRESHOLDS: [(u32, &str, &str); 5] = [
    (7680, "8K", "danger"),
    (5120, "5K", "warning"),
    (3840, "4K", "success"),
    (2560, "2K", "primary"),
    (1920, "1080P", "info"),
];

impl Resolution {
    /// Label a resolution by its longest side
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let longest = width.max(height);
        let (label, tier) = RESOLUTION_THRESHOLDS
            .iter()
            .find(|(min, _, _)| longest >= *min)
            .map(|(_, label, tier)| (*label, *tier))
            .unwrap_or(("SD", "secondary"));

        Self {
            width,
            height,
            label: label.to_string(),
            tier: tier.to_string(),
        }
    }

    /// Fixed resolution of daily-feed UHD images
    pub fn feed_uhd() -> Self {
        Self {
            width: 3840,
            height: 2160,
            label: "4K UHD".to_string(),
            tier: "success".to_string(),
        }
    }
}

/// Identifier that may be published as a string or a number
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(n) => n.to_string(),
        }
    }
}

/// Wallpaper entry as published in category and page files
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawWallpaper {
    pub id: Option<RawId>,
    pub filename: Option<String>,
    pub category: Option<String>,
    pub path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub preview_path: Option<String>,
    /// Per-image tag used for CDN cache control
    pub cdn_tag: Option<String>,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub size: Option<u64>,
    pub format: Option<String>,
    pub created_at: Option<String>,
    pub resolution: Option<Resolution>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub tags: Vec<String>,
}

/// Daily-feed entry as published in `latest.json` and year files
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFeedItem {
    /// `YYYY-MM-DD`, unique within the feed
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub copyright: String,
    #[serde(default)]
    pub copyrightlink: Option<String>,
    #[serde(default)]
    pub urlbase: String,
}

/// Extra fields carried by daily-feed wallpapers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedDetails {
    pub date: String,
    pub title: String,
    pub copyright: String,
    pub copyright_link: Option<String>,
    pub urlbase: String,
    pub is_bing: bool,
}

/// Transformed wallpaper exposed to consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperItem {
    pub id: String,
    pub filename: String,
    pub category: String,
    pub url: String,
    pub thumbnail_url: String,
    pub preview_url: Option<String>,
    pub download_url: String,
    pub size: u64,
    pub format: String,
    pub created_at: Option<String>,
    pub resolution: Option<Resolution>,
    pub tags: Vec<String>,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub feed: Option<FeedDetails>,
}

impl WallpaperItem {
    /// Feed date, the dedup and sort key of daily-feed items
    pub fn date(&self) -> Option<&str> {
        self.feed.as_ref().map(|feed| feed.date.as_str())
    }

    pub fn is_feed(&self) -> bool {
        self.feed.is_some()
    }
}

/// Aggregate figures over a wallpaper list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub jpg: usize,
    pub png: usize,
    pub total_size: u64,
    pub total_size_formatted: String,
}

impl Statistics {
    pub fn from_items(items: &[WallpaperItem]) -> Self {
        let jpg = items
            .iter()
            .filter(|w| w.format == "JPG" || w.format == "JPEG")
            .count();
        let png = items.iter().filter(|w| w.format == "PNG").count();
        let total_size = items.iter().map(|w| w.size).sum();

        Self {
            total: items.len(),
            jpg,
            png,
            total_size,
            total_size_formatted: format_size(total_size),
        }
    }
}

/// Format a byte count with binary units, e.g. `1.5 MB`
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Number of client-side pages for `count` items, at least one
pub fn page_count(count: usize, page_size: usize) -> u32 {
    let page_size = if page_size == 0 {
        loading::DEFAULT_PAGE_SIZE
    } else {
        page_size
    };
    count.div_ceil(page_size).max(1) as u32
}

/// Items of 1-based page `page` over `items`
pub fn page_slice(items: &[WallpaperItem], page: u32, page_size: usize) -> &[WallpaperItem] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page as usize - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, format: &str, size: u64) -> WallpaperItem {
        WallpaperItem {
            id: id.to_string(),
            filename: format!("{}.{}", id, format.to_lowercase()),
            category: "nature".to_string(),
            url: String::new(),
            thumbnail_url: String::new(),
            preview_url: None,
            download_url: String::new(),
            size,
            format: format.to_string(),
            created_at: None,
            resolution: None,
            tags: Vec::new(),
            feed: None,
        }
    }

    #[test]
    fn test_resolution_labels() {
        assert_eq!(Resolution::from_dimensions(3840, 2160).label, "4K");
        assert_eq!(Resolution::from_dimensions(1080, 1920).label, "1080P");
        assert_eq!(Resolution::from_dimensions(800, 600).label, "SD");
        assert_eq!(Resolution::from_dimensions(7680, 4320).tier, "danger");
    }

    #[test]
    fn test_raw_wallpaper_accepts_numeric_id() {
        let raw: RawWallpaper =
            serde_json::from_str(r#"{"id": 42, "filename": "a.jpg", "tags": ["x"]}"#).unwrap();
        assert_eq!(raw.id.unwrap().into_string(), "42");
        assert_eq!(raw.tags, vec!["x".to_string()]);
    }

    #[test]
    fn test_statistics() {
        let items = vec![
            item("a", "JPG", 1024),
            item("b", "PNG", 1024),
            item("c", "JPEG", 512),
        ];
        let stats = Statistics::from_items(&items);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.jpg, 2);
        assert_eq!(stats.png, 1);
        assert_eq!(stats.total_size, 2560);
        assert_eq!(stats.total_size_formatted, "2.5 KB");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1_572_864), "1.5 MB");
    }

    #[test]
    fn test_client_side_paging() {
        let items: Vec<WallpaperItem> = (0..65).map(|i| item(&i.to_string(), "JPG", 0)).collect();
        assert_eq!(page_count(items.len(), 30), 3);
        assert_eq!(page_count(0, 30), 1);

        let second = page_slice(&items, 2, 30);
        assert_eq!(second.len(), 30);
        assert_eq!(second[0].id, "30");
        assert_eq!(second[29].id, "59");

        assert_eq!(page_slice(&items, 3, 30).len(), 5);
        assert!(page_slice(&items, 4, 30).is_empty());
        assert!(page_slice(&items, 0, 30).is_empty());
    }
}
