//! Command handlers for the Wallpaper Gallery CLI
//!
//! Each handler assembles a store from the loaded configuration, drives one
//! loading strategy and prints the resulting view.

use std::fmt::Write as _;

use tracing::{info, warn};

use crate::app::{CacheStats, Statistics, StoreSnapshot, WallpaperItem, WallpaperStore};
use crate::cli::{
    BrowseArgs, FilterArgs, LoadArgs, ProgressConfig, RefillProgress, ShowArgs, StatsArgs,
};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the browse command
pub async fn handle_browse(config: &AppConfig, args: BrowseArgs) -> Result<()> {
    args.validate().map_err(AppError::generic)?;
    let store = config.build_store()?;
    let mut snapshot = load_series(config, &store, &args.series, &args.load).await?;

    if args.page > 1 {
        if !store.go_to_page(args.page).await? {
            warn!(
                "Page {} is out of range (1..={})",
                args.page, snapshot.load.total_pages
            );
        }
        snapshot = store.snapshot().await;
    }

    if args.all {
        let merged = store.load_all_categories(&args.series).await?;
        info!("Loaded {} more categories of {}", merged, args.series);
        snapshot = store.snapshot().await;
    }

    if args.json {
        print_json(&snapshot)?;
    } else {
        print!("{}", render_listing(&args.series, &snapshot, args.limit));
    }
    Ok(())
}

/// Handle the filter command
pub async fn handle_filter(config: &AppConfig, args: FilterArgs) -> Result<()> {
    args.validate().map_err(AppError::generic)?;
    let store = config.build_store()?;
    load_series(config, &store, &args.series, &args.load).await?;

    store.switch_to_filter_mode(&args.key, args.page_size).await?;
    if args.page > 1 && !store.go_to_filter_page(args.page).await {
        warn!("Filter page {} is out of range", args.page);
    }
    let snapshot = store.snapshot().await;

    if args.json {
        print_json(&snapshot)?;
    } else {
        let label = format!("{} / {}", args.series, args.key);
        print!("{}", render_listing(&label, &snapshot, args.limit));
    }
    Ok(())
}

/// Handle the show command
pub async fn handle_show(config: &AppConfig, args: ShowArgs) -> Result<()> {
    let store = config.build_store()?;
    load_series(config, &store, &args.series, &args.load).await?;

    let wallpaper = store.wallpaper_by_id(&args.id).await.ok_or_else(|| {
        AppError::generic(format!(
            "Wallpaper '{}' not found in {}",
            args.id, args.series
        ))
    })?;
    let position = store.wallpaper_index(&args.id).await;
    let prev = store.prev_wallpaper(&args.id).await;
    let next = store.next_wallpaper(&args.id).await;

    print!(
        "{}",
        render_details(&wallpaper, position, prev.as_ref(), next.as_ref())
    );
    Ok(())
}

/// Handle the stats command
pub async fn handle_stats(config: &AppConfig, args: StatsArgs) -> Result<()> {
    let store = config.build_store()?;
    let snapshot = load_series(config, &store, &args.series, &args.load).await?;

    let statistics = store.statistics().await;
    let cache = store.cache_stats().await;

    if args.json {
        let report = serde_json::json!({
            "series": args.series,
            "displayTotal": snapshot.display_total(),
            "statistics": statistics,
            "cache": cache,
        });
        print_json(&report)?;
    } else {
        print!(
            "{}",
            render_stats(&args.series, &snapshot, &statistics, &cache)
        );
    }
    Ok(())
}

/// Initialise `series_id` and optionally wait for its background refill
async fn load_series(
    config: &AppConfig,
    store: &WallpaperStore,
    series_id: &str,
    load: &LoadArgs,
) -> Result<StoreSnapshot> {
    if load.paginated {
        store.init_series_paginated(series_id, false).await?;
    } else {
        store.init_series(series_id, false).await?;
    }

    if load.no_wait {
        return Ok(store.snapshot().await);
    }

    let progress = RefillProgress::new(ProgressConfig {
        enabled: config.logging.colored_output,
        ..ProgressConfig::default()
    });
    Ok(progress.track(store, series_id).await)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::generic(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// One line per wallpaper, e.g. `  1. mountains  [4K]  2.5 MB`
fn wallpaper_line(position: usize, wallpaper: &WallpaperItem) -> String {
    let mut line = format!("{:>4}. {}", position, wallpaper.id);
    if let Some(resolution) = &wallpaper.resolution {
        let _ = write!(line, "  [{}]", resolution.label);
    }
    if wallpaper.size > 0 {
        let _ = write!(line, "  {}", crate::app::format_size(wallpaper.size));
    }
    if let Some(feed) = &wallpaper.feed {
        let _ = write!(line, "  {}", feed.title);
    }
    line
}

/// Human-readable listing of the current view
pub fn render_listing(label: &str, snapshot: &StoreSnapshot, limit: usize) -> String {
    let load = &snapshot.load;
    let mut out = String::new();

    let _ = write!(out, "📁 {}: {} wallpapers", label, snapshot.display_total());
    if load.total_pages > 1 {
        let _ = write!(out, " (page {} of {})", load.current_page, load.total_pages);
    }
    out.push('\n');

    if let Some(error) = &load.error {
        let _ = writeln!(out, "⚠️  {}", error);
    }

    let offset = if snapshot.filter.is_filter_mode || !load.loaded_pages.is_empty() {
        (load.current_page.saturating_sub(1) as usize) * load.page_size
    } else {
        0
    };
    for (i, wallpaper) in snapshot.wallpapers().iter().take(limit).enumerate() {
        let _ = writeln!(out, "{}", wallpaper_line(offset + i + 1, wallpaper));
    }

    let hidden = snapshot.wallpapers().len().saturating_sub(limit);
    if hidden > 0 {
        let _ = writeln!(out, "   ... and {} more", hidden);
    }
    out
}

/// Detail view of one wallpaper with its neighbours
pub fn render_details(
    wallpaper: &WallpaperItem,
    position: Option<usize>,
    prev: Option<&WallpaperItem>,
    next: Option<&WallpaperItem>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🖼  {}", wallpaper.id);
    if let Some(feed) = &wallpaper.feed {
        let _ = writeln!(out, "   Title:      {}", feed.title);
        let _ = writeln!(out, "   Date:       {}", feed.date);
        if !feed.copyright.is_empty() {
            let _ = writeln!(out, "   Copyright:  {}", feed.copyright);
        }
    }
    if !wallpaper.category.is_empty() {
        let _ = writeln!(out, "   Category:   {}", wallpaper.category);
    }
    if let Some(resolution) = &wallpaper.resolution {
        let _ = writeln!(
            out,
            "   Resolution: {}x{} ({})",
            resolution.width, resolution.height, resolution.label
        );
    }
    if wallpaper.size > 0 {
        let _ = writeln!(
            out,
            "   Size:       {}",
            crate::app::format_size(wallpaper.size)
        );
    }
    let _ = writeln!(out, "   URL:        {}", wallpaper.url);
    let _ = writeln!(out, "   Thumbnail:  {}", wallpaper.thumbnail_url);
    let _ = writeln!(out, "   Download:   {}", wallpaper.download_url);
    if let Some(position) = position {
        let _ = writeln!(out, "   Position:   {}", position + 1);
    }
    let _ = writeln!(
        out,
        "   Previous:   {}",
        prev.map(|w| w.id.as_str()).unwrap_or("-")
    );
    let _ = writeln!(
        out,
        "   Next:       {}",
        next.map(|w| w.id.as_str()).unwrap_or("-")
    );
    out
}

/// Statistics report for the stats command
pub fn render_stats(
    series_id: &str,
    snapshot: &StoreSnapshot,
    statistics: &Statistics,
    cache: &CacheStats,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 {} statistics", series_id);
    let _ = writeln!(out, "   Wallpapers: {}", statistics.total);
    let _ = writeln!(out, "   Announced:  {}", snapshot.load.expected_total);
    let _ = writeln!(out, "   JPG:        {}", statistics.jpg);
    let _ = writeln!(out, "   PNG:        {}", statistics.png);
    let _ = writeln!(out, "   Total size: {}", statistics.total_size_formatted);
    let _ = writeln!(
        out,
        "   Cache:      {} entries ({} categories, {} pages, {} filters)",
        cache.total_entries(),
        cache.categories,
        cache.pages,
        cache.filters
    );
    out
}
