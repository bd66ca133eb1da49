//! # sticker-dl
//!
//! Catalog discovery and bulk download of sticker collections.
//!
//! ## Design Philosophy
//!
//! sticker-dl is designed to be:
//! - **Bounded** - One global ceiling on in-flight transfers, however many categories run
//! - **Terminating** - Pagination always ends, even against providers that over-declare
//! - **Failure-preserving** - Every failed asset is reported by URL, nothing is swallowed
//! - **Library-first** - Menus, spinners and exit codes belong to the embedding program
//!
//! ## Quick Start
//!
//! ```no_run
//! use sticker_dl::{Config, Event, SelectByTitle, SourceKind, StickerDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = StickerDownloader::new(Config::default(), SourceKind::Flipgrid)?;
//!
//!     // Follow per-asset progress
//!     let mut events = downloader.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             if let Event::AssetFailed { url, error, .. } = event {
//!                 eprintln!("{url}: {error}");
//!             }
//!         }
//!     });
//!
//!     let summary = downloader.run(&SelectByTitle::new(["Emojis"])).await?;
//!     println!(
//!         "{} saved, {} failed",
//!         summary.success_count(),
//!         summary.failure_count()
//!     );
//!     for url in summary.failed_urls() {
//!         println!("failed: {url}");
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Listing and download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Operator category selection
pub mod selection;
/// Provider adapters
pub mod source;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, HttpConfig, PaginationConfig, SourcesConfig};
pub use downloader::StickerDownloader;
pub use downloader::aggregate::{CategoryFailure, FailedAsset, RunSummary, SavedAsset};
pub use downloader::executor::{AssetFetcher, BoundedExecutor, HttpAssetFetcher};
pub use error::{AssetDownloadError, Error, ErrorScope, Result};
pub use selection::{CategorySelector, SelectAll, SelectById, SelectByTitle};
pub use source::{CatalogSource, FlipgridSource, ItemPage, SourceKind, TeamsSource};
pub use types::{
    Category, CategoryBatchResult, CategoryId, DownloadTask, Event, Item, ItemId, Outcome,
};
