//! Catalog listing and bulk download orchestration.
//!
//! The `StickerDownloader` struct and its helpers are organized by stage:
//! - [`catalog`] - Paginated item listing with an attempt budget
//! - [`tasks`] - Item to destination path translation
//! - [`executor`] - Bounded-concurrency task execution
//! - [`aggregate`] - Reduction of category batches into a run summary

pub mod aggregate;
mod catalog;
pub mod executor;
pub mod tasks;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::broadcast;

use crate::config::Config;
use crate::error::{AssetDownloadError, Result};
use crate::selection::CategorySelector;
use crate::source::{CatalogSource, SourceKind, http_client};
use crate::types::{Category, CategoryBatchResult, Event, Item, Outcome};

use aggregate::RunSummary;
use executor::{AssetFetcher, BoundedExecutor, HttpAssetFetcher};
use tasks::{category_directory, category_tasks};

/// Capacity of the event channel; slow subscribers lag instead of blocking downloads
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main entry point: lists a source's catalog and downloads selected categories
///
/// Cloning is cheap; clones share the source adapter, the concurrency limit
/// and the event channel.
#[derive(Clone)]
pub struct StickerDownloader {
    config: Arc<Config>,
    source: Arc<dyn CatalogSource>,
    executor: BoundedExecutor,
    event_tx: broadcast::Sender<Event>,
}

impl StickerDownloader {
    /// Create a downloader for one of the built-in sources
    pub fn new(config: Config, kind: SourceKind) -> Result<Self> {
        config.validate()?;
        let client = http_client(&config.http)?;
        let source = kind.create(client.clone(), &config.sources)?;
        Ok(Self::assemble(
            config,
            source,
            Arc::new(HttpAssetFetcher::new(client)),
        ))
    }

    /// Create a downloader for a custom source adapter
    pub fn with_source(config: Config, source: Arc<dyn CatalogSource>) -> Result<Self> {
        config.validate()?;
        let client = http_client(&config.http)?;
        Ok(Self::assemble(
            config,
            source,
            Arc::new(HttpAssetFetcher::new(client)),
        ))
    }

    /// Create a downloader with a custom source adapter and asset transport
    pub fn with_fetcher(
        config: Config,
        source: Arc<dyn CatalogSource>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, source, fetcher))
    }

    fn assemble(
        config: Config,
        source: Arc<dyn CatalogSource>,
        fetcher: Arc<dyn AssetFetcher>,
    ) -> Self {
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let executor = BoundedExecutor::new(fetcher, config.download.max_concurrent_downloads)
            .with_events(event_tx.clone());

        Self {
            config: Arc::new(config),
            source,
            executor,
            event_tx,
        }
    }

    /// Subscribe to listing and download events
    ///
    /// Events sent while nobody is subscribed are dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    pub(crate) fn emit_event(&self, event: Event) {
        self.event_tx.send(event).ok();
    }

    /// Display name of the configured source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Retrieve the source's categories
    ///
    /// Fails with `CatalogUnavailable` or `DiscoveryFailed`; no partial
    /// catalog is ever returned.
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        let categories = self.source.list_categories().await?;

        for category in &categories {
            tracing::info!(
                source = self.source.name(),
                id = %category.id,
                title = %category.title,
                declared = category.declared_count,
                "discovered category"
            );
        }
        self.emit_event(Event::CategoriesListed {
            source: self.source.name().to_string(),
            count: categories.len(),
        });

        Ok(categories)
    }

    /// List exactly the items of `category`, paginating until its declared count
    pub async fn list_items(&self, category: &Category) -> Result<Vec<Item>> {
        catalog::list_category_items(
            self.source.as_ref(),
            category,
            &self.config.pagination,
            &self.event_tx,
        )
        .await
    }

    /// Download every asset of `categories` below `download_root`
    ///
    /// Listing runs category by category. The resulting batches then run
    /// concurrently, all sharing the one global in-flight limit. Exactly one
    /// batch is returned per category, in input order.
    pub async fn download_categories(
        &self,
        categories: &[Category],
        download_root: &Path,
    ) -> Vec<CategoryBatchResult> {
        let mut listed = Vec::with_capacity(categories.len());
        for category in categories {
            let started_at = Utc::now();
            let listing = self.list_items(category).await;
            listed.push((category.clone(), started_at, listing));
        }

        let batches = listed
            .into_iter()
            .map(|(category, started_at, listing)| {
                self.run_batch(category, started_at, listing, download_root)
            });
        join_all(batches).await
    }

    async fn run_batch(
        &self,
        category: Category,
        started_at: chrono::DateTime<Utc>,
        listing: Result<Vec<Item>>,
        download_root: &Path,
    ) -> CategoryBatchResult {
        let finish = |category: Category, outcomes: Vec<Outcome>, failure: Option<String>| {
            CategoryBatchResult {
                category,
                outcomes,
                failure,
                started_at,
                finished_at: Utc::now(),
            }
        };

        let items = match listing {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(
                    category = %category.title,
                    error = %e,
                    error_code = e.error_code(),
                    "category listing failed"
                );
                self.emit_event(Event::CategoryFailed {
                    category: category.title.clone(),
                    error: e.to_string(),
                });
                return finish(category, Vec::new(), Some(e.to_string()));
            }
        };

        let directory =
            category_directory(download_root, self.source.subdirectory(), &category.title);
        let tasks = category_tasks(&directory, &category, &items);

        if tasks.is_empty() {
            tracing::info!(category = %category.title, "category has no assets");
            self.emit_event(Event::CategoryFinished {
                category: category.title.clone(),
                saved: 0,
                failed: 0,
            });
            return finish(category, Vec::new(), None);
        }

        if let Err(e) = tokio::fs::create_dir_all(&directory).await {
            tracing::error!(
                category = %category.title,
                path = %directory.display(),
                error = %e,
                "failed to create category directory"
            );
            let cause = AssetDownloadError::DirectoryCreation {
                path: directory.clone(),
                message: e.to_string(),
            };
            let outcomes = tasks
                .into_iter()
                .map(|task| Outcome::Failed {
                    url: task.item.source_url,
                    cause: cause.clone(),
                })
                .collect();
            self.emit_event(Event::CategoryFailed {
                category: category.title.clone(),
                error: cause.to_string(),
            });
            return finish(category, outcomes, Some(cause.to_string()));
        }

        self.emit_event(Event::CategoryStarted {
            category: category.title.clone(),
            tasks: tasks.len(),
        });

        let outcomes = self.executor.run(tasks).await;
        let batch = finish(category, outcomes, None);

        tracing::info!(
            category = %batch.category.title,
            saved = batch.saved_count(),
            failed = batch.failed_count(),
            "category finished"
        );
        self.emit_event(Event::CategoryFinished {
            category: batch.category.title.clone(),
            saved: batch.saved_count(),
            failed: batch.failed_count(),
        });

        batch
    }

    /// List categories, let `selector` choose, and download the selection
    /// into the configured root
    pub async fn run(&self, selector: &dyn CategorySelector) -> Result<RunSummary> {
        let categories = self.get_categories().await?;
        let selected = selector.select(&categories);

        tracing::info!(
            source = self.source.name(),
            available = categories.len(),
            selected = selected.len(),
            "starting download"
        );

        let batches = self
            .download_categories(&selected, self.config.download_root())
            .await;
        let summary = RunSummary::from_batches(&batches);

        tracing::info!(
            saved = summary.success_count(),
            failed = summary.failure_count(),
            failed_categories = summary.failed_categories.len(),
            "run finished"
        );
        Ok(summary)
    }
}
