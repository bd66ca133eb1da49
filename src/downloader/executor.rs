//! Bounded-concurrency execution of download tasks
//!
//! One [`BoundedExecutor`] is shared by every category of a run. Its
//! semaphore is the single global ceiling on in-flight transfers, so running
//! more categories at once never multiplies the load on the network.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::{Semaphore, broadcast};

use crate::error::AssetDownloadError;
use crate::types::{DownloadTask, Event, Outcome};
use crate::utils::write_atomically;

/// Abstraction over fetching one asset payload, enabling testability.
#[async_trait::async_trait]
pub trait AssetFetcher: Send + Sync {
    /// Fetch the full payload at `url`
    ///
    /// A non-success status is an error; it is never retried.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetDownloadError>;
}

/// Production [`AssetFetcher`] backed by a shared `reqwest` client.
pub struct HttpAssetFetcher {
    client: reqwest::Client,
}

impl HttpAssetFetcher {
    /// Create a fetcher using the given client (timeouts come from the client)
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AssetFetcher for HttpAssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetDownloadError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AssetDownloadError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Runs download tasks with at most `max_in_flight` of them active at once
#[derive(Clone)]
pub struct BoundedExecutor {
    fetcher: Arc<dyn AssetFetcher>,
    limit: Arc<Semaphore>,
    max_in_flight: usize,
    event_tx: Option<broadcast::Sender<Event>>,
}

impl BoundedExecutor {
    /// Create an executor; a limit of 0 is raised to 1
    pub fn new(fetcher: Arc<dyn AssetFetcher>, max_in_flight: usize) -> Self {
        let max_in_flight = max_in_flight.max(1);
        Self {
            fetcher,
            limit: Arc::new(Semaphore::new(max_in_flight)),
            max_in_flight,
            event_tx: None,
        }
    }

    /// Publish `AssetSaved` / `AssetFailed` events on `event_tx`
    pub fn with_events(mut self, event_tx: broadcast::Sender<Event>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    /// The global in-flight ceiling
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    /// Execute every task and return exactly one outcome per task
    ///
    /// Outcomes arrive in completion order. A failing task never stops its
    /// siblings; the call returns only after all tasks have finished.
    pub async fn run(&self, tasks: Vec<DownloadTask>) -> Vec<Outcome> {
        stream::iter(tasks)
            .map(|task| self.execute(task))
            .buffer_unordered(self.max_in_flight)
            .collect()
            .await
    }

    async fn execute(&self, task: DownloadTask) -> Outcome {
        let outcome = match self.transfer(&task).await {
            Ok(()) => {
                tracing::debug!(
                    category = %task.category,
                    path = %task.destination.display(),
                    "asset saved"
                );
                Outcome::Saved {
                    path: task.destination.clone(),
                }
            }
            Err(cause) => {
                tracing::warn!(
                    category = %task.category,
                    url = %task.item.source_url,
                    error = %cause,
                    "asset download failed"
                );
                Outcome::Failed {
                    url: task.item.source_url.clone(),
                    cause,
                }
            }
        };

        self.emit_outcome(&task, &outcome);
        outcome
    }

    /// Fetch and persist one asset while holding a global permit
    async fn transfer(&self, task: &DownloadTask) -> Result<(), AssetDownloadError> {
        let _permit = self
            .limit
            .acquire()
            .await
            .map_err(|e| AssetDownloadError::Transport(e.to_string()))?;

        let bytes = self.fetcher.fetch(&task.item.source_url).await?;

        write_atomically(&task.destination, &bytes)
            .await
            .map_err(|e| AssetDownloadError::Write {
                path: task.destination.clone(),
                message: e.to_string(),
            })
    }

    fn emit_outcome(&self, task: &DownloadTask, outcome: &Outcome) {
        let Some(event_tx) = &self.event_tx else {
            return;
        };
        let event = match outcome {
            Outcome::Saved { path } => Event::AssetSaved {
                category: task.category.clone(),
                path: path.clone(),
            },
            Outcome::Failed { url, cause } => Event::AssetFailed {
                category: task.category.clone(),
                url: url.clone(),
                error: cause.to_string(),
            },
        };
        event_tx.send(event).ok();
    }
}
