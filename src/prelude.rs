//! Prelude module for the Wallpaper Gallery library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use wallpaper_gallery::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use wallpaper_gallery::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = AppConfig::default().build_store()?;
//!     store.init_series_paginated("desktop", false).await?;
//!
//!     if store.has_next_page().await {
//!         store.load_next_page().await;
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, CatalogError, ErrorKind, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Catalog and transports
    Catalog,
    CatalogConfig,
    ClientConfig,
    DecodeWorker,
    Decoder,
    Fetcher,
    HttpTransport,
    LocalFileTransport,
    RetryPolicy,

    // Store and its state
    FilterState,
    LoadState,
    LoaderConfig,
    StoreSnapshot,
    WallpaperStore,

    // Data types
    SeriesIndex,
    Statistics,
    WallpaperItem,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_PAGE_SIZE, DEFAULT_RATE_LIMIT_RPS, MAX_ATTEMPTS};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
