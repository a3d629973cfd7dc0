//! Local data directory transport
//!
//! Inside the desktop shell the catalog is bundled next to the application.
//! Relative requests (`./data/...`, `data/...`, `/data/...`) are served from
//! that directory; anything else falls through to an optional inner transport.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{Transport, TransportResponse};
use crate::errors::{FetchError, FetchResult};

/// Transport reading catalog files from disk
#[derive(Debug, Clone)]
pub struct LocalFileTransport {
    root: PathBuf,
    fallback: Option<Arc<dyn Transport>>,
}

impl LocalFileTransport {
    /// Serve relative requests from `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    /// Forward non-local requests to `fallback`
    pub fn with_fallback(mut self, fallback: Arc<dyn Transport>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Whether a request targets the bundled data directory
    pub fn is_local(url: &str) -> bool {
        url.starts_with("./") || url.starts_with("data/") || url.starts_with("/data/")
    }

    /// Resolve a local request to a file path below the root
    fn resolve(&self, url: &str) -> FetchResult<PathBuf> {
        let without_query = url.split(['?', '#']).next().unwrap_or(url);
        let relative = without_query
            .trim_start_matches("./")
            .trim_start_matches('/');

        let relative_path = Path::new(relative);
        if relative_path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(FetchError::InvalidUrl {
                url: url.to_string(),
                reason: "path escapes the data directory".to_string(),
            });
        }

        Ok(self.root.join(relative_path))
    }
}

#[async_trait]
impl Transport for LocalFileTransport {
    async fn get(&self, url: &str) -> FetchResult<TransportResponse> {
        if !Self::is_local(url) {
            return match &self.fallback {
                Some(fallback) => fallback.get(url).await,
                None => Err(FetchError::InvalidUrl {
                    url: url.to_string(),
                    reason: "not a local data path".to_string(),
                }),
            };
        }

        let path = self.resolve(url)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(body) => {
                debug!("Read local file {} ({} bytes)", path.display(), body.len());
                Ok(TransportResponse::ok(body))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Local file not found: {}", path.display());
                Ok(TransportResponse::new(404, String::new()))
            }
            Err(source) => Err(FetchError::LocalFile { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::MemoryTransport;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_reads_relative_paths() {
        let temp_dir = TempDir::new().unwrap();
        let series_dir = temp_dir.path().join("data").join("desktop");
        std::fs::create_dir_all(&series_dir).unwrap();
        std::fs::write(series_dir.join("index.json"), r#"{"total": 1}"#).unwrap();

        let transport = LocalFileTransport::new(temp_dir.path());
        for url in [
            "./data/desktop/index.json",
            "data/desktop/index.json",
            "/data/desktop/index.json?v=3",
        ] {
            let response = transport.get(url).await.unwrap();
            assert_eq!(response.status, 200);
            assert_eq!(response.json().unwrap()["total"], 1);
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_404() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new(temp_dir.path());
        let response = transport.get("data/missing.json").await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_rejects_parent_components() {
        let temp_dir = TempDir::new().unwrap();
        let transport = LocalFileTransport::new(temp_dir.path());
        let err = transport.get("data/../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_remote_urls_use_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let memory = Arc::new(MemoryTransport::new());
        memory.insert("https://cdn.example/a.json", TransportResponse::ok("{}"));

        let transport = LocalFileTransport::new(temp_dir.path()).with_fallback(memory.clone());
        let response = transport.get("https://cdn.example/a.json").await.unwrap();
        assert!(response.is_success());
        assert_eq!(memory.request_count("https://cdn.example/a.json"), 1);

        let bare = LocalFileTransport::new(temp_dir.path());
        assert!(bare.get("https://cdn.example/a.json").await.is_err());
    }
}
