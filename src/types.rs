//! Core types for sticker-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::AssetDownloadError;

/// Identifier of a category, unique within one source
///
/// Sources disagree on identifier types (numeric vs string), so ids are kept
/// as their textual form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    /// Create a new CategoryId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the textual id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for CategoryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CategoryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of an item, unique within its category
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A group of assets exposed by a source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Source-unique id
    pub id: CategoryId,
    /// Human-readable label (not guaranteed unique)
    pub title: String,
    /// Number of assets the source claims the category holds
    ///
    /// Only used to stop pagination; never trusted for allocation sizing.
    pub declared_count: usize,
}

impl Category {
    /// Create a new Category
    pub fn new(id: impl Into<CategoryId>, title: impl Into<String>, declared_count: usize) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            declared_count,
        }
    }
}

/// One downloadable asset within a category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Id unique within the category
    pub id: ItemId,
    /// Name the saved file is derived from
    pub display_name: String,
    /// Position used as a sortable filename prefix
    pub sequence_position: u32,
    /// Absolute URL of the payload
    pub source_url: String,
    /// File extension of the payload, without the dot
    pub extension: String,
}

/// One asset paired with the path it will be saved to
///
/// Tasks carry no shared state, so any number of them can run at once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadTask {
    /// Title of the category the item was listed under
    pub category: String,
    /// The asset to fetch
    pub item: Item,
    /// Fully resolved destination file
    pub destination: PathBuf,
}

/// Result of executing one [`DownloadTask`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The payload was written to `path`
    Saved {
        /// Where the asset was saved
        path: PathBuf,
    },
    /// The task failed; `url` identifies the failed request
    Failed {
        /// URL that could not be saved
        url: String,
        /// Why it failed
        cause: AssetDownloadError,
    },
}

impl Outcome {
    /// Whether the asset was saved
    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved { .. })
    }
}

/// All outcomes for one category
#[derive(Clone, Debug)]
pub struct CategoryBatchResult {
    /// The category the batch belongs to
    pub category: Category,
    /// One outcome per generated task, in completion order
    pub outcomes: Vec<Outcome>,
    /// Set when the batch could not run as a whole (listing or directory failure)
    pub failure: Option<String>,
    /// When work on the category started
    pub started_at: DateTime<Utc>,
    /// When the last outcome was collected
    pub finished_at: DateTime<Utc>,
}

impl CategoryBatchResult {
    /// Number of saved assets
    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    /// Number of failed assets
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.saved_count()
    }

    /// Whether the batch failed before or instead of downloading anything
    pub fn is_fully_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Event emitted while listing and downloading
///
/// Consumers (spinners, loggers, UIs) subscribe via
/// [`StickerDownloader::subscribe`](crate::StickerDownloader::subscribe).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// The category list of a source was retrieved
    CategoriesListed {
        /// Source name
        source: String,
        /// Number of categories found
        count: usize,
    },

    /// One listing page was retrieved
    PageFetched {
        /// Category title
        category: String,
        /// Page number (1-based)
        page: u32,
        /// Items on the page
        items: usize,
    },

    /// One listing page failed and was skipped
    PageFailed {
        /// Category title
        category: String,
        /// Page number (1-based)
        page: u32,
        /// Error message
        error: String,
    },

    /// Downloads for a category were submitted
    CategoryStarted {
        /// Category title
        category: String,
        /// Number of tasks submitted
        tasks: usize,
    },

    /// One asset was saved
    AssetSaved {
        /// Category title
        category: String,
        /// Saved file
        path: PathBuf,
    },

    /// One asset failed
    AssetFailed {
        /// Category title
        category: String,
        /// Failed URL
        url: String,
        /// Error message
        error: String,
    },

    /// Every task of a category produced an outcome
    CategoryFinished {
        /// Category title
        category: String,
        /// Saved assets
        saved: usize,
        /// Failed assets
        failed: usize,
    },

    /// A category could not be processed at all
    CategoryFailed {
        /// Category title
        category: String,
        /// Error message
        error: String,
    },
}
