//! Wallpaper Gallery Library
//!
//! Catalog engine for a static wallpaper gallery: fetches and decodes series
//! indexes, category files, server pages and a daily feed from a CDN, caches
//! them for the session, and drives progressive loading into an observable
//! store with atomic background refills.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(MAX_ATTEMPTS, 3);
        assert_eq!(DEFAULT_PAGE_SIZE, 30);
        assert!(http::USER_AGENT.contains("Wallpaper-Gallery"));
    }

    #[test]
    fn test_error_types() {
        let fetch_error = errors::FetchError::HttpStatus {
            url: "https://data.test/desktop/index.json".to_string(),
            status: 503,
        };
        let app_error = AppError::Catalog(errors::CatalogError::Fetch(fetch_error));

        assert_eq!(app_error.category(), "network");
        assert!(app_error.is_recoverable());
    }
}
