//! Normalization of catalog payloads at the decode boundary
//!
//! Every catalog file may carry its data either as plain JSON fields or as an
//! encoded `blob`/`payload` string. When an encoded field is present it
//! supersedes the plain fields; the plain fields are only consulted when the
//! encoded field fails to decode.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::app::decoder::Decoder;
use crate::app::models::{CategoryRef, RawFeedItem, RawWallpaper, SeriesIndex, WallpaperItem, YearRef};
use crate::app::urls::UrlBuilder;
use crate::constants::{decoder, loading};
use crate::errors::{CatalogError, CatalogResult};

/// List key of category, page and filter files
pub const WALLPAPERS_KEY: &str = "wallpapers";

/// List key of daily-feed files
pub const FEED_ITEMS_KEY: &str = "items";

/// Index file as published, before normalization
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawIndex {
    generated_at: Option<String>,
    series_name: Option<String>,
    total: Option<usize>,
    category_count: Option<usize>,
    page_size: Option<usize>,
    total_pages: Option<u32>,
    pages: Option<Value>,
    years: Option<Vec<YearRef>>,
    schema: Option<u64>,
}

/// First non-empty encoded field of a payload
pub fn encoded_field(data: &Value) -> Option<&str> {
    decoder::ENCODED_FIELDS
        .iter()
        .filter_map(|field| data.get(*field).and_then(Value::as_str))
        .find(|encoded| !encoded.is_empty())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A decoded payload is either the list itself or an object holding it
fn unwrap_list(decoded: Value, key: &str) -> Value {
    match decoded {
        Value::Object(mut map) => match map.remove(key) {
            Some(list) => list,
            None => Value::Object(map),
        },
        other => other,
    }
}

/// Extract the item array stored under `key`, decoding when needed
///
/// # Errors
///
/// `CatalogError::Decode` when the encoded field is broken and no plain list
/// exists, `CatalogError::Format` when the result is not an array.
pub async fn item_values(
    decoder: &Decoder,
    data: &Value,
    key: &str,
    context: &str,
) -> CatalogResult<Vec<Value>> {
    let list = match encoded_field(data) {
        Some(encoded) => match decoder.decode(encoded).await {
            Ok(decoded) => unwrap_list(decoded, key),
            Err(source) => match data.get(key) {
                Some(plain) => {
                    warn!(
                        "Failed to decode {}, using plain {}: {}",
                        context, key, source
                    );
                    plain.clone()
                }
                None => {
                    return Err(CatalogError::Decode {
                        context: context.to_string(),
                        source,
                    })
                }
            },
        },
        None => data
            .get(key)
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
    };

    match list {
        Value::Array(items) => Ok(items),
        other => Err(CatalogError::format(
            context,
            format!("expected {} to be an array, found {}", key, json_type(&other)),
        )),
    }
}

/// Deserialize and transform wallpaper entries
pub fn wallpapers(
    urls: &UrlBuilder,
    values: Vec<Value>,
    context: &str,
) -> CatalogResult<Vec<WallpaperItem>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let raw: RawWallpaper = serde_json::from_value(value)
                .map_err(|e| CatalogError::format(context, format!("entry {}: {}", i, e)))?;
            urls.wallpaper(raw)
        })
        .collect()
}

/// Deserialize and transform daily-feed entries
pub fn feed_wallpapers(
    urls: &UrlBuilder,
    values: Vec<Value>,
    context: &str,
) -> CatalogResult<Vec<WallpaperItem>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let raw: RawFeedItem = serde_json::from_value(value)
                .map_err(|e| CatalogError::format(context, format!("entry {}: {}", i, e)))?;
            Ok(urls.feed_wallpaper(raw))
        })
        .collect()
}

/// Normalize an index file into a [`SeriesIndex`]
///
/// A decoded index payload is the categories array. The index is valid when
/// it carries categories, pagination (`pages` with `totalPages > 0`) or
/// daily-feed years.
pub async fn series_index(
    decoder: &Decoder,
    series_id: &str,
    data: Value,
) -> CatalogResult<SeriesIndex> {
    let context = format!("{} index", series_id);

    let categories = match encoded_field(&data) {
        Some(encoded) => match decoder.decode(encoded).await {
            Ok(decoded) => Some(unwrap_list(decoded, "categories")),
            Err(source) => match data.get("categories") {
                Some(plain) => {
                    warn!("Failed to decode {}, using plain categories: {}", context, source);
                    Some(plain.clone())
                }
                None => return Err(CatalogError::Decode { context, source }),
            },
        },
        None => data.get("categories").cloned(),
    };

    let raw: RawIndex = serde_json::from_value(data)
        .map_err(|e| CatalogError::format(&context, e.to_string()))?;

    let categories = match categories {
        Some(value @ Value::Array(_)) => Some(
            serde_json::from_value::<Vec<CategoryRef>>(value)
                .map_err(|e| CatalogError::format(&context, format!("categories: {}", e)))?,
        ),
        _ => None,
    };
    let pages = match raw.pages {
        Some(Value::Array(pages)) => Some(pages),
        _ => None,
    };
    let total_pages = raw.total_pages.unwrap_or(0);
    let years = raw.years.unwrap_or_default();

    let has_categories = categories.is_some();
    let has_pagination = pages.is_some() && total_pages > 0;
    if !has_categories && !has_pagination && years.is_empty() {
        return Err(CatalogError::format(
            &context,
            "missing categories array or pagination info",
        ));
    }

    Ok(SeriesIndex {
        series_id: series_id.to_string(),
        series_name: raw.series_name,
        total: raw.total.unwrap_or(0),
        category_count: raw.category_count,
        categories: categories.unwrap_or_default(),
        page_size: raw
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or(loading::DEFAULT_PAGE_SIZE),
        total_pages,
        pages: pages.unwrap_or_default(),
        years,
        generated_at: raw.generated_at,
        schema: raw.schema,
    })
}
