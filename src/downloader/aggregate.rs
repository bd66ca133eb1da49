//! Reduction of category batches into a run summary

use std::path::PathBuf;

use serde::Serialize;

use crate::error::AssetDownloadError;
use crate::types::{CategoryBatchResult, Outcome};

/// An asset that was written to disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SavedAsset {
    /// Category title
    pub category: String,
    /// Saved file
    pub path: PathBuf,
}

/// An asset that could not be saved
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedAsset {
    /// Category title
    pub category: String,
    /// URL of the failed request
    pub url: String,
    /// Why it failed
    pub cause: AssetDownloadError,
}

/// A category whose batch failed as a whole
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryFailure {
    /// Category title
    pub category: String,
    /// What went wrong
    pub reason: String,
}

/// Successes and failures across every category of a run
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Saved assets
    pub successes: Vec<SavedAsset>,
    /// Failed assets
    pub failures: Vec<FailedAsset>,
    /// Categories that failed before or instead of downloading
    pub failed_categories: Vec<CategoryFailure>,
}

impl RunSummary {
    /// Partition every outcome of every batch
    ///
    /// The result does not depend on the order of batches or outcomes beyond
    /// the order entries appear in.
    pub fn from_batches(batches: &[CategoryBatchResult]) -> Self {
        let mut summary = RunSummary::default();

        for batch in batches {
            let category = &batch.category.title;

            for outcome in &batch.outcomes {
                match outcome {
                    Outcome::Saved { path } => summary.successes.push(SavedAsset {
                        category: category.clone(),
                        path: path.clone(),
                    }),
                    Outcome::Failed { url, cause } => summary.failures.push(FailedAsset {
                        category: category.clone(),
                        url: url.clone(),
                        cause: cause.clone(),
                    }),
                }
            }

            if let Some(reason) = &batch.failure {
                summary.failed_categories.push(CategoryFailure {
                    category: category.clone(),
                    reason: reason.clone(),
                });
            }
        }

        summary
    }

    /// Number of saved assets
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed assets
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// URLs of every failed asset
    pub fn failed_urls(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.url.as_str()).collect()
    }

    /// No asset and no category failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.failed_categories.is_empty()
    }
}
