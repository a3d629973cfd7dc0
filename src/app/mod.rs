//! Core application logic for Wallpaper Gallery
//!
//! This module contains the catalog engine: transports and the retrying
//! fetcher, the payload decoder and its background worker, the cached catalog
//! of series, and the [`WallpaperStore`] that orchestrates loading.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use wallpaper_gallery::app::client::ClientConfig;
//! use wallpaper_gallery::app::{
//!     Catalog, Decoder, Fetcher, HttpTransport, LoaderConfig, RetryPolicy, WallpaperStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(HttpTransport::from_config(&ClientConfig::default())?);
//! let catalog = Catalog::new(
//!     Fetcher::new(transport, RetryPolicy::default()),
//!     Decoder::inline(),
//! );
//! let store = WallpaperStore::new(Arc::new(catalog), LoaderConfig::default());
//!
//! store.init_series("mobile", false).await?;
//! println!("{} wallpapers", store.display_total().await);
//!
//! store.wait_for_background().await;
//! for wallpaper in store.snapshot().await.wallpapers() {
//!     println!("{} {}", wallpaper.id, wallpaper.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod codec;
pub mod decoder;
pub mod loader;
pub mod models;
pub mod urls;

// Re-export main public API
pub use catalog::{CacheStats, Catalog, CatalogConfig, SeriesConfig, SeriesRegistry};
pub use client::{
    ClientConfig, Fetcher, HttpTransport, LocalFileTransport, MemoryTransport, RetryPolicy,
    Transport, TransportResponse,
};
pub use decoder::{DecodeWorker, Decoder, OffloadContext};
pub use loader::{
    FilterState, LoadState, LoaderConfig, LoaderConfigBuilder, StoreSnapshot, WallpaperStore,
};
pub use models::{
    CategoryRef, Resolution, SeriesIndex, Statistics, WallpaperItem, YearRef, format_size,
};
pub use urls::UrlBuilder;
