//! Application constants for Wallpaper Gallery
//!
//! This module centralizes the defaults used throughout the catalog engine,
//! organized by functional domain.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Wallpaper-Gallery/", env!("CARGO_PKG_VERSION"));

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// Rate limiting and retry configuration
pub mod limits {
    /// Default request rate against the CDN (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 20;

    /// Maximum fetch attempts per request
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay for linear backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 1000;
}

/// Decode pipeline constants
pub mod decoder {
    /// Payloads longer than this (in chars) are offloaded to the worker
    pub const WORKER_THRESHOLD: usize = 1000;

    /// Request channel capacity of the decode worker
    pub const WORKER_CHANNEL_CAPACITY: usize = 32;

    /// Field names carrying an encoded payload, in lookup order
    pub const ENCODED_FIELDS: [&str; 2] = ["blob", "payload"];
}

/// Loading strategy constants
pub mod loading {
    use super::Duration;

    /// Categories loaded in the foreground by the burst strategy
    pub const INITIAL_CATEGORY_COUNT: usize = 3;

    /// Categories per background batch
    pub const CATEGORY_BATCH_SIZE: usize = 3;

    /// Pause between background category batches
    pub const CATEGORY_BATCH_PAUSE: Duration = Duration::from_millis(150);

    /// Pause between daily-feed year files
    pub const YEAR_FILE_PAUSE: Duration = Duration::from_millis(50);

    /// Page size used when the index does not declare one
    pub const DEFAULT_PAGE_SIZE: usize = 30;

    /// Filter key selecting the complete daily-feed dataset
    pub const FILTER_ALL: &str = "all";
}

/// CDN endpoints
pub mod cdn {
    /// Catalog data root
    pub const DATA_BASE_URL: &str = "https://wallpaper.061129.xyz/data";

    /// Image CDN root, image paths are appended verbatim
    pub const IMAGE_BASE_URL: &str = "https://cdn.jsdelivr.net/gh/IT-NuanxinPro/nuanXinProPic@main";

    /// Daily-feed host for full-size images
    pub const FEED_UHD_BASE_URL: &str = "https://cn.bing.com";

    /// Daily-feed host for thumbnails and previews
    pub const FEED_PREVIEW_BASE_URL: &str = "https://www.bing.com";

    /// Name of the index file in every series directory
    pub const INDEX_FILE: &str = "index.json";

    /// Name of the daily-feed snapshot file
    pub const LATEST_FILE: &str = "latest.json";
}

/// Built-in series identifiers
pub mod series {
    pub const DESKTOP: &str = "desktop";
    pub const MOBILE: &str = "mobile";
    pub const AVATAR: &str = "avatar";
    pub const BING: &str = "bing";
}

/// Configuration file locations
pub mod config {
    /// Application directory name under the user config dir
    pub const APP_DIR: &str = "wallpaper-gallery";

    /// Project-local config file name
    pub const LOCAL_FILE: &str = "wallpaper-gallery.toml";

    /// Config file name inside the app directory
    pub const FILE_NAME: &str = "config.toml";
}

pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_ATTEMPTS};
pub use loading::DEFAULT_PAGE_SIZE;
