//! CDN URL construction and item transformation
//!
//! Catalog files publish relative image paths; this module turns raw wire
//! entries into [`WallpaperItem`]s with absolute URLs.

use crate::app::models::{FeedDetails, RawFeedItem, RawWallpaper, Resolution, WallpaperItem};
use crate::constants::cdn;
use crate::errors::{CatalogError, CatalogResult};

/// Builds image URLs against the configured CDN hosts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    image_base: String,
    feed_uhd_base: String,
    feed_preview_base: String,
}

impl Default for UrlBuilder {
    fn default() -> Self {
        Self::new(
            cdn::IMAGE_BASE_URL,
            cdn::FEED_UHD_BASE_URL,
            cdn::FEED_PREVIEW_BASE_URL,
        )
    }
}

impl UrlBuilder {
    pub fn new(
        image_base: impl Into<String>,
        feed_uhd_base: impl Into<String>,
        feed_preview_base: impl Into<String>,
    ) -> Self {
        Self {
            image_base: trim_base(image_base.into()),
            feed_uhd_base: trim_base(feed_uhd_base.into()),
            feed_preview_base: trim_base(feed_preview_base.into()),
        }
    }

    /// Absolute image URL for a CDN-relative path
    ///
    /// The per-image `cdn_tag` is appended as a query parameter so a changed
    /// image invalidates only its own CDN cache entry.
    pub fn image_url(&self, path: &str, cdn_tag: Option<&str>) -> String {
        let separator = if path.starts_with('/') { "" } else { "/" };
        let mut url = format!("{}{}{}", self.image_base, separator, path);
        if let Some(tag) = cdn_tag.filter(|tag| !tag.is_empty()) {
            url.push_str(if url.contains('?') { "&v=" } else { "?v=" });
            url.push_str(tag);
        }
        url
    }

    pub fn feed_uhd_url(&self, urlbase: &str) -> String {
        if urlbase.is_empty() {
            return String::new();
        }
        format!("{}{}_UHD.jpg", self.feed_uhd_base, urlbase)
    }

    pub fn feed_thumbnail_url(&self, urlbase: &str) -> String {
        if urlbase.is_empty() {
            return String::new();
        }
        format!("{}{}_400x240.jpg", self.feed_preview_base, urlbase)
    }

    pub fn feed_preview_url(&self, urlbase: &str) -> String {
        if urlbase.is_empty() {
            return String::new();
        }
        format!("{}{}_1920x1080.jpg", self.feed_preview_base, urlbase)
    }

    /// Transform a catalog entry, resolving relative paths to CDN URLs
    pub fn wallpaper(&self, raw: RawWallpaper) -> CatalogResult<WallpaperItem> {
        let tag = raw.cdn_tag.as_deref();

        let filename = raw
            .filename
            .clone()
            .or_else(|| raw.path.as_deref().and_then(file_name_of))
            .unwrap_or_default();
        let id = match raw.id {
            Some(id) => id.into_string(),
            None if !filename.is_empty() => filename.clone(),
            None => {
                return Err(CatalogError::format(
                    "wallpaper entry",
                    "missing both id and filename",
                ))
            }
        };

        let url = match &raw.path {
            Some(path) => self.image_url(path, tag),
            None => raw.url.clone().unwrap_or_default(),
        };
        let download_url = match &raw.path {
            Some(path) => self.image_url(path, tag),
            None => raw.download_url.clone().unwrap_or_default(),
        };
        let thumbnail_url = match &raw.thumbnail_path {
            Some(path) => self.image_url(path, tag),
            None => raw.thumbnail_url.clone().unwrap_or_default(),
        };
        let preview_url = match &raw.preview_path {
            Some(path) => Some(self.image_url(path, tag)),
            None => raw.preview_url.clone(),
        };

        let format = raw
            .format
            .clone()
            .or_else(|| extension_of(&filename))
            .unwrap_or_default()
            .to_uppercase();
        let resolution = raw.resolution.clone().or_else(|| match (raw.width, raw.height) {
            (Some(width), Some(height)) => Some(Resolution::from_dimensions(width, height)),
            _ => None,
        });

        Ok(WallpaperItem {
            id,
            filename,
            category: raw.category.unwrap_or_default(),
            url,
            thumbnail_url,
            preview_url,
            download_url,
            size: raw.size.unwrap_or(0),
            format,
            created_at: raw.created_at,
            resolution,
            tags: raw.tags,
            feed: None,
        })
    }

    /// Transform a daily-feed entry; feed images are served by the feed host
    pub fn feed_wallpaper(&self, raw: RawFeedItem) -> WallpaperItem {
        let uhd = self.feed_uhd_url(&raw.urlbase);
        let month = raw.date.get(..7).unwrap_or(&raw.date).to_string();

        WallpaperItem {
            id: format!("bing-{}", raw.date),
            filename: format!("bing-{}.jpg", raw.date),
            category: month.clone(),
            url: uhd.clone(),
            thumbnail_url: self.feed_thumbnail_url(&raw.urlbase),
            preview_url: Some(self.feed_preview_url(&raw.urlbase)),
            download_url: uhd,
            size: 0,
            format: "JPG".to_string(),
            created_at: Some(format!("{}T00:00:00Z", raw.date)),
            resolution: Some(Resolution::feed_uhd()),
            tags: vec![raw.title.clone(), month],
            feed: Some(FeedDetails {
                date: raw.date,
                title: raw.title,
                copyright: raw.copyright,
                copyright_link: raw.copyrightlink,
                urlbase: raw.urlbase,
                is_bing: true,
            }),
        }
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

fn file_name_of(path: &str) -> Option<String> {
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn extension_of(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_string())
        .filter(|ext| !ext.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::RawId;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("https://img.example/", "https://uhd.example", "https://pre.example")
    }

    #[test]
    fn test_image_url_with_tag() {
        let urls = builder();
        assert_eq!(
            urls.image_url("/wallpaper/desktop/a.jpg", None),
            "https://img.example/wallpaper/desktop/a.jpg"
        );
        assert_eq!(
            urls.image_url("wallpaper/a.jpg", Some("abc")),
            "https://img.example/wallpaper/a.jpg?v=abc"
        );
    }

    #[test]
    fn test_wallpaper_transform_prefers_paths() {
        let raw = RawWallpaper {
            id: Some(RawId::Text("w1".to_string())),
            filename: Some("a.png".to_string()),
            path: Some("/wallpaper/a.png".to_string()),
            thumbnail_path: Some("/thumbnail/a.webp".to_string()),
            url: Some("https://ignored".to_string()),
            width: Some(2560),
            height: Some(1440),
            ..Default::default()
        };

        let item = builder().wallpaper(raw).unwrap();
        assert_eq!(item.url, "https://img.example/wallpaper/a.png");
        assert_eq!(item.download_url, item.url);
        assert_eq!(item.thumbnail_url, "https://img.example/thumbnail/a.webp");
        assert_eq!(item.preview_url, None);
        assert_eq!(item.format, "PNG");
        assert_eq!(item.resolution.unwrap().label, "2K");
    }

    #[test]
    fn test_wallpaper_transform_keeps_absolute_urls() {
        let raw = RawWallpaper {
            filename: Some("b.jpg".to_string()),
            url: Some("https://elsewhere/b.jpg".to_string()),
            ..Default::default()
        };

        let item = builder().wallpaper(raw).unwrap();
        assert_eq!(item.id, "b.jpg");
        assert_eq!(item.url, "https://elsewhere/b.jpg");
        assert_eq!(item.download_url, "");
    }

    #[test]
    fn test_wallpaper_without_identity_is_rejected() {
        let err = builder().wallpaper(RawWallpaper::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Format { .. }));
    }

    #[test]
    fn test_feed_transform() {
        let raw = RawFeedItem {
            date: "2025-01-15".to_string(),
            title: "Lake".to_string(),
            copyright: "(c) someone".to_string(),
            copyrightlink: None,
            urlbase: "/th?id=OHR.Lake".to_string(),
        };

        let item = builder().feed_wallpaper(raw);
        assert_eq!(item.id, "bing-2025-01-15");
        assert_eq!(item.category, "2025-01");
        assert_eq!(item.url, "https://uhd.example/th?id=OHR.Lake_UHD.jpg");
        assert_eq!(
            item.thumbnail_url,
            "https://pre.example/th?id=OHR.Lake_400x240.jpg"
        );
        assert_eq!(item.date(), Some("2025-01-15"));
        assert!(item.feed.unwrap().is_bing);
    }
}
