//! Error types for sticker-dl
//!
//! Two families of errors exist:
//! - [`Error`] for operations that abort something larger than one asset
//!   (a whole run, a source, or one category's listing)
//! - [`AssetDownloadError`] for the per-asset failures that are captured into
//!   an [`Outcome`](crate::types::Outcome) instead of being propagated

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sticker-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sticker-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "max_concurrent_downloads")
        key: Option<String>,
    },

    /// The category listing endpoint was unreachable or answered with a non-success status
    #[error("{source_name} catalog unavailable: {reason}")]
    CatalogUnavailable {
        /// Display name of the source
        source_name: String,
        /// What went wrong
        reason: String,
    },

    /// A pre-listing discovery step (e.g. content-version lookup) failed
    #[error("{source_name} discovery failed: {reason}")]
    DiscoveryFailed {
        /// Display name of the source
        source_name: String,
        /// What went wrong
        reason: String,
    },

    /// The pagination safety bound was hit before the declared count was reached
    #[error(
        "pagination exhausted for category '{category}': {collected}/{declared} items after {attempts} page attempts"
    )]
    PaginationExhausted {
        /// Category title
        category: String,
        /// Number of page requests issued
        attempts: u32,
        /// Items collected before giving up
        collected: usize,
        /// Items the source declared for the category
        declared: usize,
    },

    /// One page of a category listing could not be fetched or decoded
    #[error("failed to fetch page {page} of category '{category}': {reason}")]
    PageFetch {
        /// Category title
        category: String,
        /// Page number (1-based)
        page: u32,
        /// What went wrong
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How far an [`Error`] reaches
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorScope {
    /// Aborts the whole run before any selection is possible
    Run,
    /// Aborts the current source; another source may still be tried
    Source,
    /// Aborts one category's listing; sibling categories proceed
    Category,
    /// Recovered where it happens (logged and skipped)
    Local,
}

impl Error {
    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::CatalogUnavailable { .. } => "catalog_unavailable",
            Error::DiscoveryFailed { .. } => "discovery_failed",
            Error::PaginationExhausted { .. } => "pagination_exhausted",
            Error::PageFetch { .. } => "page_fetch_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Classify how much of a run this error takes down
    pub fn scope(&self) -> ErrorScope {
        match self {
            Error::Config { .. } | Error::CatalogUnavailable { .. } => ErrorScope::Run,
            Error::DiscoveryFailed { .. } => ErrorScope::Source,
            Error::PaginationExhausted { .. } => ErrorScope::Category,
            Error::PageFetch { .. } => ErrorScope::Local,
            // IO/decode errors only escape from config loading
            Error::Io(_) | Error::Serialization(_) => ErrorScope::Run,
        }
    }

    pub(crate) fn config(message: impl Into<String>, key: &str) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}

/// Failure of a single asset download
///
/// Captured in [`Outcome::Failed`](crate::types::Outcome::Failed); never aborts sibling tasks.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssetDownloadError {
    /// The server answered with a non-success status
    #[error("HTTP {code} {reason}")]
    Status {
        /// HTTP status code
        code: u16,
        /// Canonical reason phrase (may be empty)
        reason: String,
    },

    /// Connection failure, timeout, or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The payload was fetched but could not be persisted
    #[error("failed to write {}: {message}", path.display())]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error message
        message: String,
    },

    /// The category directory could not be created, so the task never ran
    #[error("failed to create directory {}: {message}", path.display())]
    DirectoryCreation {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error message
        message: String,
    },
}

impl From<reqwest::Error> for AssetDownloadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AssetDownloadError::Transport(format!("timed out: {e}"))
        } else if e.is_connect() {
            AssetDownloadError::Transport(format!("connection failed: {e}"))
        } else {
            AssetDownloadError::Transport(e.to_string())
        }
    }
}
