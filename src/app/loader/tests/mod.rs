//! Unit tests for the wallpaper store
//!
//! Every test drives the store against a scripted `MemoryTransport`, so no
//! network access is needed and request counts can be asserted exactly.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::app::catalog::{Catalog, CatalogConfig};
use crate::app::client::memory::{MemoryTransport, Scripted};
use crate::app::client::{Fetcher, RetryPolicy, TransportResponse};
use crate::app::codec;
use crate::app::decoder::Decoder;
use crate::errors::ErrorKind;

use super::*;

const BASE: &str = "https://data.test";

/// Create a store over `transport` with fast pauses and a pinned month
///
/// Retries use a 1ms base delay so failure paths stay quick.
pub fn create_test_store(transport: Arc<MemoryTransport>) -> WallpaperStore {
    let config = LoaderConfigBuilder::new()
        .category_batch_pause(Duration::from_millis(5))
        .year_file_pause(Duration::from_millis(1))
        .pinned_month("2025-01")
        .build_unchecked();
    create_test_store_with_config(transport, config)
}

/// Create a store over `transport` with an explicit loader configuration
pub fn create_test_store_with_config(
    transport: Arc<MemoryTransport>,
    config: LoaderConfig,
) -> WallpaperStore {
    let catalog_config = CatalogConfig {
        data_base_url: BASE.to_string(),
        image_base_url: "https://img.test".to_string(),
        ..CatalogConfig::default()
    };
    let policy = RetryPolicy {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
    };
    let catalog = Catalog::from_config(
        &catalog_config,
        Fetcher::new(transport, policy),
        Decoder::inline(),
    );
    WallpaperStore::new(Arc::new(catalog), config)
}

fn url(series: &str, file: &str) -> String {
    format!("{}/{}/{}", BASE, series, file)
}

/// Wallpaper entries `{prefix}-{start}` .. `{prefix}-{start + count - 1}`
fn entries(prefix: &str, start: usize, count: usize) -> Vec<Value> {
    (start..start + count)
        .map(|i| {
            json!({
                "id": format!("{}-{}", prefix, i),
                "filename": format!("{}-{}.jpg", prefix, i),
                "path": format!("{}/{}-{}.jpg", prefix, prefix, i),
                "size": 1024
            })
        })
        .collect()
}

/// Paginated desktop series: three pages of 30, 30 and 5 items
fn install_paginated(transport: &MemoryTransport) {
    transport.insert_json(
        url("desktop", "index.json"),
        &json!({
            "total": 65,
            "pageSize": 30,
            "totalPages": 3,
            "pages": [{"page": 1}, {"page": 2}, {"page": 3}],
            "categories": [{"file": "nature.json", "name": "Nature"}]
        }),
    );
    transport.insert_json(url("desktop", "page-1.json"), &json!({"wallpapers": entries("p", 0, 30)}));
    let encoded = codec::encode_value(&json!(entries("p", 30, 30)));
    transport.insert_json(url("desktop", "page-2.json"), &json!({"blob": encoded}));
    transport.insert_json(url("desktop", "page-3.json"), &json!({"wallpapers": entries("p", 60, 5)}));
    transport.insert_json(url("desktop", "nature.json"), &json!({"wallpapers": entries("n", 0, 65)}));
}

/// Category series `series` with `count` categories of two items each
fn install_categories(transport: &MemoryTransport, series: &str, count: usize) {
    let categories: Vec<Value> = (0..count)
        .map(|i| json!({"file": format!("c{}.json", i), "name": format!("C{}", i)}))
        .collect();
    transport.insert_json(
        url(series, "index.json"),
        &json!({"total": count * 2, "categories": categories}),
    );
    for i in 0..count {
        transport.insert_json(
            url(series, &format!("c{}.json", i)),
            &json!({"wallpapers": entries(&format!("{}{}", series, i), 0, 2)}),
        );
    }
}

fn feed_entry(date: &str) -> Value {
    json!({"date": date, "title": format!("Day {}", date), "urlbase": format!("/th?id={}", date)})
}

/// Daily feed with a snapshot and two year files
fn install_feed(transport: &MemoryTransport) {
    transport.insert_json(
        url("bing", "index.json"),
        &json!({"total": 5, "years": [
            {"year": 2024, "file": "2024.json"},
            {"year": 2025, "file": "2025.json"}
        ]}),
    );
    transport.insert_json(
        url("bing", "latest.json"),
        &json!({"items": [feed_entry("2025-01-03"), feed_entry("2025-01-02"), feed_entry("2024-12-31")]}),
    );
    transport.insert_json(
        url("bing", "2025.json"),
        &json!({"items": [feed_entry("2025-01-01"), feed_entry("2025-01-02"), feed_entry("2025-01-03")]}),
    );
    transport.insert_json(
        url("bing", "2024.json"),
        &json!({"items": [feed_entry("2024-12-30"), feed_entry("2024-12-31")]}),
    );
}

fn ids(snapshot: &StoreSnapshot) -> Vec<String> {
    snapshot.wallpapers().iter().map(|w| w.id.clone()).collect()
}

#[tokio::test]
async fn test_paginated_init_shows_first_page() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport.clone());

    store.init_series_paginated("desktop", false).await.unwrap();
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.load.current_series.as_deref(), Some("desktop"));
    assert_eq!(snapshot.load.total_pages, 3);
    assert_eq!(snapshot.load.current_page, 1);
    assert_eq!(snapshot.load.expected_total, 65);
    assert_eq!(snapshot.load.pages_info.len(), 3);
    assert_eq!(snapshot.wallpapers().len(), 30);
    assert!(!snapshot.load.loading);
    assert!(snapshot.load.error.is_none());
    assert!(store.is_first_page().await);
    assert!(store.has_next_page().await);
}

#[tokio::test]
async fn test_go_to_page() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport.clone());
    store.init_series_paginated("desktop", false).await.unwrap();

    assert!(store.go_to_page(2).await.unwrap());
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.load.current_page, 2);
    assert_eq!(snapshot.wallpapers()[0].id, "p-30");
    assert_eq!(snapshot.wallpapers().len(), 30);

    // Same page, zero and past the end leave the state alone
    assert!(!store.go_to_page(2).await.unwrap());
    assert!(!store.go_to_page(0).await.unwrap());
    assert!(!store.go_to_page(4).await.unwrap());
    assert_eq!(store.snapshot().await, snapshot);

    // Page 1 comes from the cache
    assert!(store.go_to_page(1).await.unwrap());
    assert_eq!(transport.request_count(&url("desktop", "page-1.json")), 1);
    assert_eq!(store.snapshot().await.load.loaded_pages.len(), 2);
}

#[tokio::test]
async fn test_latest_page_jump_wins() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    transport.set_delay(url("desktop", "page-2.json"), Duration::from_millis(50));
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();

    let slow = {
        let store = store.clone();
        tokio::spawn(async move { store.go_to_page(2).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(store.go_to_page(3).await.unwrap());

    assert!(!slow.await.unwrap().unwrap());
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.load.current_page, 3);
    assert_eq!(snapshot.wallpapers()[0].id, "p-60");
    assert!(!snapshot.load.loading);
}

#[tokio::test]
async fn test_load_next_page_appends_until_last() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();

    assert!(store.load_next_page().await);
    assert!(store.load_next_page().await);
    assert!(!store.load_next_page().await);

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.wallpapers().len(), 65);
    assert_eq!(snapshot.load.current_page, 3);
    assert!(store.is_last_page().await);
}

#[tokio::test]
async fn test_reinit_same_series_is_noop_unless_forced() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();
    store.go_to_page(3).await.unwrap();

    store.init_series_paginated("desktop", false).await.unwrap();
    assert_eq!(store.snapshot().await.load.current_page, 3);

    store.init_series_paginated("desktop", true).await.unwrap();
    assert_eq!(store.snapshot().await.load.current_page, 1);
}

#[tokio::test]
async fn test_category_burst_commits_once() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 7);
    transport.set_delay(url("mobile", "c6.json"), Duration::from_millis(100));
    let store = create_test_store(transport);

    store.init_series("mobile", false).await.unwrap();
    let first = store.snapshot().await;
    assert_eq!(first.wallpapers().len(), 6);
    assert!(first.load.is_background_loading);
    assert_eq!(first.load.initial_loaded_count, 6);
    assert_eq!(store.display_total().await, 14);

    // Batches one and two have landed in the cache, nothing is displayed yet
    tokio::time::sleep(Duration::from_millis(40)).await;
    assert_eq!(store.snapshot().await.wallpapers().len(), 6);

    store.wait_for_background().await;
    let settled = store.snapshot().await;
    assert_eq!(settled.wallpapers().len(), 14);
    assert!(!settled.load.is_background_loading);
    assert_eq!(settled.load.loaded_categories.len(), 7);
    assert_eq!(store.display_total().await, 14);
    assert_eq!(settled.wallpapers()[13].id, "mobile6-1");
}

#[tokio::test]
async fn test_burst_without_remainder_sets_expected_total() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "avatar", 2);
    let store = create_test_store(transport);

    store.init_series("avatar", false).await.unwrap();
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.wallpapers().len(), 4);
    assert_eq!(snapshot.load.expected_total, 4);
    assert!(!snapshot.load.is_background_loading);
}

#[tokio::test]
async fn test_background_failure_is_swallowed() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 5);
    transport.insert(url("mobile", "c4.json"), TransportResponse::new(500, "boom"));
    let store = create_test_store(transport);

    store.init_series("mobile", false).await.unwrap();
    store.wait_for_background().await;
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.wallpapers().len(), 8);
    assert!(!snapshot.load.is_background_loading);
    assert!(snapshot.load.error.is_none());
    assert!(!snapshot.load.loaded_categories.contains("c4.json"));
}

#[tokio::test]
async fn test_series_switch_discards_stale_refill() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 6);
    install_categories(&transport, "avatar", 2);
    transport.set_delay(url("mobile", "c3.json"), Duration::from_millis(50));
    let store = create_test_store(transport);

    store.init_series("mobile", false).await.unwrap();
    assert!(store.snapshot().await.load.is_background_loading);

    store.init_series("avatar", false).await.unwrap();
    store.wait_for_background().await;
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.load.current_series.as_deref(), Some("avatar"));
    assert_eq!(snapshot.wallpapers().len(), 4);
    assert!(ids(&snapshot).iter().all(|id| id.starts_with("avatar")));
    assert!(!snapshot.load.is_background_loading);
}

#[tokio::test]
async fn test_superseded_init_error_is_dropped() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "avatar", 2);
    transport.insert(url("mobile", "index.json"), TransportResponse::new(404, "missing"));
    transport.set_delay(url("mobile", "index.json"), Duration::from_millis(50));
    let store = create_test_store(transport);

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.init_series("mobile", false).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    store.init_series("avatar", false).await.unwrap();

    // The failed mobile init belongs to a superseded session
    assert!(pending.await.unwrap().is_ok());
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.load.current_series.as_deref(), Some("avatar"));
    assert!(snapshot.load.error.is_none());
    assert!(snapshot.load.error_kind.is_none());
    assert_eq!(snapshot.wallpapers().len(), 4);
    assert!(ids(&snapshot).iter().all(|id| id.starts_with("avatar")));
}

#[tokio::test]
async fn test_zero_batch_size_still_settles_refill() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 5);
    let config = LoaderConfigBuilder::new()
        .category_batch_size(0)
        .category_batch_pause(Duration::from_millis(1))
        .build_unchecked();
    let store = create_test_store_with_config(transport, config);

    store.init_series("mobile", false).await.unwrap();
    store.wait_for_background().await;
    let snapshot = store.snapshot().await;

    assert_eq!(snapshot.wallpapers().len(), 10);
    assert!(!snapshot.load.is_background_loading);
    assert_eq!(store.display_total().await, 10);
    assert_eq!(store.load_all_categories("mobile").await.unwrap(), 0);
}

#[tokio::test]
async fn test_panicking_refill_clears_background_flag() {
    let store = create_test_store(Arc::new(MemoryTransport::new()));
    let token = store.begin_session("mobile").await;
    store
        .commit(&token, |state| state.load.is_background_loading = true)
        .await;

    store.spawn_background(&token, async { panic!("refill blew up") });
    store.wait_for_background().await;

    assert!(!store.snapshot().await.load.is_background_loading);
}

#[tokio::test]
async fn test_load_all_categories() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 5);
    let store = create_test_store(transport);
    store.init_series("mobile", false).await.unwrap();

    // Whichever of the refill and the explicit load lands first, nothing is
    // appended twice
    let merged = store.load_all_categories("mobile").await.unwrap();
    assert!(merged <= 2);
    store.wait_for_background().await;

    let snapshot = store.snapshot().await;
    let mut seen = ids(&snapshot);
    assert_eq!(seen.len(), 10);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 10);
    assert!(!snapshot.load.loading);
    assert!(!snapshot.load.is_background_loading);
    assert_eq!(store.load_all_categories("mobile").await.unwrap(), 0);
}

#[tokio::test]
async fn test_load_all_categories_keeps_filter_view() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "mobile", 5);
    transport.insert(url("mobile", "c4.json"), TransportResponse::new(500, "boom"));
    transport.insert_json(url("mobile", "favorites.json"), &json!({"wallpapers": entries("f", 0, 3)}));
    let store = create_test_store(transport.clone());
    store.init_series("mobile", false).await.unwrap();
    store.wait_for_background().await;
    assert!(!store.snapshot().await.load.loaded_categories.contains("c4.json"));

    store.switch_to_filter_mode("favorites", 2).await.unwrap();
    let filtered = store.snapshot().await;

    transport.insert_json(url("mobile", "c4.json"), &json!({"wallpapers": entries("mobile4", 0, 2)}));
    assert_eq!(store.load_all_categories("mobile").await.unwrap(), 1);

    let snapshot = store.snapshot().await;
    assert!(snapshot.filter.is_filter_mode);
    assert_eq!(ids(&snapshot), vec!["f-0", "f-1"]);
    assert_eq!(snapshot.wallpapers(), filtered.wallpapers());
    assert!(snapshot.load.loaded_categories.contains("c4.json"));
    assert!(!snapshot.load.loading);
}

#[tokio::test]
async fn test_foreground_error_is_classified() {
    let transport = Arc::new(MemoryTransport::new());
    transport.insert(url("desktop", "index.json"), TransportResponse::new(404, "missing"));
    let store = create_test_store(transport.clone());

    let err = store.init_series_paginated("desktop", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(transport.request_count(&url("desktop", "index.json")), 1);

    let snapshot = store.snapshot().await;
    assert!(snapshot.wallpapers().is_empty());
    assert_eq!(snapshot.load.error_kind, Some(ErrorKind::Network));
    assert!(snapshot.load.error.as_deref().unwrap().contains("series: desktop"));
    assert!(!snapshot.load.loading);
}

#[tokio::test]
async fn test_network_failures_are_retried_then_reported() {
    let transport = Arc::new(MemoryTransport::new());
    transport.script(
        url("avatar", "index.json"),
        vec![Scripted::NetworkFailure("connection reset".to_string())],
    );
    let store = create_test_store(transport.clone());

    let err = store.init_series("avatar", false).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(transport.request_count(&url("avatar", "index.json")), 2);
}

#[tokio::test]
async fn test_filter_mode_pagination() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();

    store.switch_to_filter_mode("nature", 30).await.unwrap();
    let snapshot = store.snapshot().await;
    assert!(snapshot.filter.is_filter_mode);
    assert_eq!(snapshot.filter.current_filter_key.as_deref(), Some("nature"));
    assert_eq!(snapshot.filter.all_filtered_items.len(), 65);
    assert_eq!(snapshot.load.total_pages, 3);
    assert_eq!(snapshot.load.expected_total, 65);

    assert!(store.go_to_filter_page(2).await);
    let page_two = ids(&store.snapshot().await);
    let expected: Vec<String> = (30..60).map(|i| format!("n-{}", i)).collect();
    assert_eq!(page_two, expected);

    assert!(store.go_to_filter_page(2).await);
    assert_eq!(ids(&store.snapshot().await), expected);
    assert!(!store.go_to_filter_page(4).await);

    assert!(store.load_next_filter_page().await);
    assert_eq!(store.snapshot().await.wallpapers().len(), 35);
    assert!(!store.load_next_filter_page().await);
}

#[tokio::test]
async fn test_exit_filter_mode_restores_pages() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();
    store.switch_to_filter_mode("nature", 0).await.unwrap();

    store.exit_filter_mode().await.unwrap();
    let snapshot = store.snapshot().await;

    assert!(!snapshot.filter.is_filter_mode);
    assert_eq!(snapshot.load.total_pages, 3);
    assert_eq!(snapshot.wallpapers()[0].id, "p-0");
}

#[tokio::test]
async fn test_filter_failure_keeps_view() {
    let transport = Arc::new(MemoryTransport::new());
    install_paginated(&transport);
    transport.insert(url("desktop", "city.json"), TransportResponse::new(404, ""));
    let store = create_test_store(transport);
    store.init_series_paginated("desktop", false).await.unwrap();

    assert!(store.switch_to_filter_mode("city", 30).await.is_err());
    let snapshot = store.snapshot().await;
    assert!(!snapshot.filter.is_filter_mode);
    assert_eq!(snapshot.wallpapers().len(), 30);
    assert!(snapshot.load.error.is_some());
}

#[tokio::test]
async fn test_filter_without_series() {
    let store = create_test_store(Arc::new(MemoryTransport::new()));
    let err = store.switch_to_filter_mode("nature", 30).await.unwrap_err();
    assert!(matches!(err, crate::errors::CatalogError::NoActiveSeries));
}

#[tokio::test]
async fn test_feed_shows_month_then_complete_dataset() {
    let transport = Arc::new(MemoryTransport::new());
    install_feed(&transport);
    transport.set_delay(url("bing", "2025.json"), Duration::from_millis(20));
    let store = create_test_store(transport);

    store.init_series("bing", false).await.unwrap();
    let first = store.snapshot().await;
    assert!(first.filter.is_filter_mode);
    assert_eq!(first.filter.current_filter_key.as_deref(), Some("2025-01"));
    assert_eq!(ids(&first), vec!["bing-2025-01-03", "bing-2025-01-02"]);
    assert!(first.load.is_background_loading);

    store.wait_for_background().await;
    let settled = store.snapshot().await;
    assert_eq!(
        ids(&settled),
        vec!["bing-2025-01-03", "bing-2025-01-02", "bing-2025-01-01"]
    );
    assert!(!settled.load.is_background_loading);
    assert_eq!(settled.load.initial_loaded_count, 5);

    let dataset = store.catalog().feed_dataset("bing").await.unwrap();
    let dates: Vec<_> = dataset.iter().filter_map(|w| w.date()).collect();
    assert_eq!(
        dates,
        vec!["2025-01-03", "2025-01-02", "2025-01-01", "2024-12-31", "2024-12-30"]
    );
}

#[tokio::test]
async fn test_feed_filters() {
    let transport = Arc::new(MemoryTransport::new());
    install_feed(&transport);
    let store = create_test_store(transport);
    store.init_feed_series("bing", false).await.unwrap();
    store.wait_for_background().await;

    store.switch_to_filter_mode("all", 2).await.unwrap();
    let all = store.snapshot().await;
    assert_eq!(all.filter.all_filtered_items.len(), 5);
    assert_eq!(all.load.total_pages, 3);

    store.switch_to_filter_mode("2024-12", 30).await.unwrap();
    assert_eq!(store.snapshot().await.wallpapers().len(), 2);

    store.exit_filter_mode().await.unwrap();
    let month = store.snapshot().await;
    assert_eq!(month.filter.current_filter_key.as_deref(), Some("2025-01"));
    assert_eq!(month.wallpapers().len(), 3);
    assert_eq!(month.load.page_size, 30);
}

#[tokio::test]
async fn test_feed_filter_with_cold_cache() {
    let transport = Arc::new(MemoryTransport::new());
    install_feed(&transport);
    transport.set_delay(url("bing", "2024.json"), Duration::from_millis(50));
    let store = create_test_store(transport);
    store.init_series_paginated("bing", false).await.unwrap();

    // The refill is still running; the filter assembles the dataset itself
    store.switch_to_filter_mode("2024-12", 30).await.unwrap();
    assert_eq!(store.snapshot().await.wallpapers().len(), 2);

    store.wait_for_background().await;
    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.filter.current_filter_key.as_deref(), Some("2024-12"));
    assert!(!snapshot.load.is_background_loading);
}

#[tokio::test]
async fn test_wallpaper_navigation() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "avatar", 2);
    let store = create_test_store(transport);
    store.init_series("avatar", false).await.unwrap();

    assert_eq!(store.wallpaper_index("avatar0-1").await, Some(1));
    assert_eq!(store.wallpaper_by_id("avatar1-0").await.unwrap().filename, "avatar1-0.jpg");
    assert_eq!(store.prev_wallpaper("avatar0-1").await.unwrap().id, "avatar0-0");
    assert_eq!(store.next_wallpaper("avatar0-1").await.unwrap().id, "avatar1-0");
    assert!(store.prev_wallpaper("avatar0-0").await.is_none());
    assert!(store.next_wallpaper("avatar1-1").await.is_none());
    assert!(store.next_wallpaper("missing").await.is_none());
    assert!(store.wallpaper_index("missing").await.is_none());
}

#[tokio::test]
async fn test_statistics_and_cache_clearing() {
    let transport = Arc::new(MemoryTransport::new());
    install_categories(&transport, "avatar", 2);
    let store = create_test_store(transport.clone());
    store.init_series("avatar", false).await.unwrap();

    let stats = store.statistics().await;
    assert_eq!(stats.total, 4);
    assert_eq!(stats.jpg, 4);
    assert_eq!(stats.total_size_formatted, "4 KB");

    assert_eq!(store.cache_stats().await.categories, 2);
    store.clear_cache(Some("avatar")).await;
    assert_eq!(store.cache_stats().await.total_entries(), 0);
    // Displayed state survives a cache clear
    assert_eq!(store.snapshot().await.wallpapers().len(), 4);

    store.init_series("avatar", true).await.unwrap();
    assert_eq!(transport.request_count(&url("avatar", "index.json")), 2);
}
