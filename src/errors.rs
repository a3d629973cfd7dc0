//! Error types for Wallpaper Gallery
//!
//! This module defines the error types for every layer of the catalog engine.
//! Errors carry enough context to classify a failure into the user-facing
//! taxonomy (`network`, `parse`, `format`, `unknown`) exactly once.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transport and retry errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    /// Server answered with a non-success status
    #[error("HTTP error! status: {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    /// Local data file could not be read through the desktop shim
    #[error("Failed to read local file: {path}")]
    LocalFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid URL provided
    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No scripted response for a request (in-memory transport)
    #[error("No response registered for {url}")]
    NoRoute { url: String },

    /// Retry loop configured with zero attempts
    #[error("Retry attempts must be at least one")]
    NoAttempts,
}

impl FetchError {
    /// Whether the failure may succeed when retried
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network { .. } => true,
            FetchError::HttpStatus { status, .. } => (500..600).contains(status),
            _ => false,
        }
    }

    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Payload decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Payload is not valid base64
    #[error("Encoded payload is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8 text
    #[error("Decoded payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not valid JSON
    #[error("Decoded payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    /// Worker returned an error or a mismatched response
    #[error("Decode worker failed: {reason}")]
    Worker { reason: String },

    /// Worker channel closed
    #[error("Decode worker is not running")]
    WorkerUnavailable,
}

/// Failure classification surfaced to the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Network,
    Parse,
    Format,
    Unknown,
}

impl ErrorKind {
    /// User-facing message for this kind of failure
    pub fn user_message(&self, context: &str) -> String {
        let context = if context.is_empty() {
            String::new()
        } else {
            format!(" ({})", context)
        };
        match self {
            ErrorKind::Network => format!(
                "Network connection failed, please check your network settings{}",
                context
            ),
            ErrorKind::Parse => format!(
                "Failed to parse data, the payload may be malformed{}",
                context
            ),
            ErrorKind::Format => format!("Unexpected data format{}", context),
            ErrorKind::Unknown => format!("Loading failed{}", context),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::Format => "format",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure after retries
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Encoded payload could not be decoded
    #[error("Failed to decode {context}")]
    Decode {
        context: String,
        #[source]
        source: DecodeError,
    },

    /// Response body is not JSON
    #[error("Failed to parse JSON for {context}")]
    Parse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON is valid but has the wrong shape
    #[error("Invalid data format for {context}: {reason}")]
    Format { context: String, reason: String },

    /// Series id is not configured
    #[error("Invalid series: {series_id}")]
    UnknownSeries { series_id: String },

    /// Operation needs a loaded series
    #[error("No series is currently loaded")]
    NoActiveSeries,
}

impl CatalogError {
    /// Classify the failure for user-facing reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Fetch(FetchError::NoAttempts) => ErrorKind::Unknown,
            CatalogError::Fetch(FetchError::InvalidUrl { .. }) => ErrorKind::Format,
            CatalogError::Fetch(_) => ErrorKind::Network,
            CatalogError::Decode { .. } | CatalogError::Parse { .. } => ErrorKind::Parse,
            CatalogError::Format { .. } | CatalogError::UnknownSeries { .. } => ErrorKind::Format,
            CatalogError::NoActiveSeries => ErrorKind::Unknown,
        }
    }

    pub(crate) fn format(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User config directory unknown
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Fetch(e) | AppError::Catalog(CatalogError::Fetch(e)) => e.is_transient(),
            AppError::Decode(DecodeError::Worker { .. })
            | AppError::Decode(DecodeError::WorkerUnavailable) => true,
            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "network",
            AppError::Decode(_) => "decode",
            AppError::Catalog(e) => e.kind().as_str(),
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Decode result type alias
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Catalog result type alias
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Config result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
