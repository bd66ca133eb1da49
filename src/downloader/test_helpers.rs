//! Shared test helpers: scripted catalog sources and instrumented fetchers.

use crate::config::Config;
use crate::downloader::StickerDownloader;
use crate::downloader::executor::AssetFetcher;
use crate::error::{AssetDownloadError, Error, Result};
use crate::source::{CatalogSource, ItemPage};
use crate::types::{Category, CategoryId, Item, ItemId};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Build an item whose URL identifies its category and position
pub(crate) fn item(category: &str, position: u32) -> Item {
    let name = format!("{}-item{}", category.to_lowercase(), position);
    Item {
        id: ItemId::from(name.as_str()),
        source_url: format!("https://cdn.test/{}.svg", name),
        display_name: name,
        sequence_position: position,
        extension: "svg".to_string(),
    }
}

/// Items `first..=last` of a category
pub(crate) fn items(category: &str, first: u32, last: u32) -> Vec<Item> {
    (first..=last).map(|p| item(category, p)).collect()
}

/// A successful page with a known page size
pub(crate) fn page(items: Vec<Item>, page_size: usize) -> std::result::Result<ItemPage, String> {
    Ok(ItemPage {
        items,
        page_size: Some(page_size),
    })
}

/// Catalog source that replays scripted pages per category
///
/// Once a category's script runs out, every further page is empty, which
/// models a provider that declares more items than it can deliver.
pub(crate) struct StubSource {
    categories: Vec<Category>,
    pages: Mutex<HashMap<CategoryId, VecDeque<std::result::Result<ItemPage, String>>>>,
    requests: Mutex<Vec<(String, u32)>>,
    unavailable: bool,
    subdirectory: Option<&'static str>,
}

impl StubSource {
    pub(crate) fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            pages: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
            unavailable: false,
            subdirectory: None,
        }
    }

    /// A source whose category listing always fails
    pub(crate) fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(Vec::new())
        }
    }

    pub(crate) fn with_subdirectory(mut self, subdirectory: &'static str) -> Self {
        self.subdirectory = Some(subdirectory);
        self
    }

    /// Script the page responses for one category, in request order
    ///
    /// Repeated calls append, so a second run can be scripted as well.
    pub(crate) fn with_pages(
        self,
        category_id: &str,
        pages: Vec<std::result::Result<ItemPage, String>>,
    ) -> Self {
        self.pages
            .lock()
            .unwrap()
            .entry(CategoryId::from(category_id))
            .or_default()
            .extend(pages);
        self
    }

    /// Every page request made so far, as (category title, page)
    pub(crate) fn requests(&self) -> Vec<(String, u32)> {
        self.requests.lock().unwrap().clone()
    }

    /// Page requests made for one category
    pub(crate) fn requests_for(&self, title: &str) -> Vec<u32> {
        self.requests()
            .into_iter()
            .filter(|(t, _)| t == title)
            .map(|(_, page)| page)
            .collect()
    }
}

#[async_trait::async_trait]
impl CatalogSource for StubSource {
    fn name(&self) -> &str {
        "Stub"
    }

    fn subdirectory(&self) -> Option<&str> {
        self.subdirectory
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        if self.unavailable {
            return Err(Error::CatalogUnavailable {
                source_name: "Stub".to_string(),
                reason: "HTTP 503 Service Unavailable".to_string(),
            });
        }
        Ok(self.categories.clone())
    }

    async fn fetch_item_page(&self, category: &Category, page: u32) -> Result<ItemPage> {
        self.requests
            .lock()
            .unwrap()
            .push((category.title.clone(), page));

        let next = self
            .pages
            .lock()
            .unwrap()
            .get_mut(&category.id)
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Ok(page_result)) => Ok(page_result),
            Some(Err(reason)) => Err(Error::PageFetch {
                category: category.title.clone(),
                page,
                reason,
            }),
            None => Ok(ItemPage::default()),
        }
    }
}

/// Asset fetcher that records concurrency and answers from a script
pub(crate) struct RecordingFetcher {
    delay: Duration,
    failing: HashMap<String, u16>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl RecordingFetcher {
    pub(crate) fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing: HashMap::new(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `url` with the given HTTP status instead of a payload
    pub(crate) fn failing(mut self, url: &str, status: u16) -> Self {
        self.failing.insert(url.to_string(), status);
        self
    }

    /// Highest number of fetches observed running at the same time
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

/// Payload served for `url` by [`RecordingFetcher`]
pub(crate) fn payload_for(url: &str) -> Vec<u8> {
    format!("<svg data-src=\"{url}\"/>").into_bytes()
}

#[async_trait::async_trait]
impl AssetFetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, AssetDownloadError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.failing.get(url) {
            Some(code) => Err(AssetDownloadError::Status {
                code: *code,
                reason: String::new(),
            }),
            None => Ok(payload_for(url)),
        }
    }
}

/// Config writing below `root` with the given concurrency
pub(crate) fn test_config(root: &Path, max_concurrent: usize) -> Config {
    let mut config = Config::default();
    config.download.download_root = root.to_path_buf();
    config.download.max_concurrent_downloads = max_concurrent;
    config
}

/// Downloader over a stub source and recording fetcher, rooted in a fresh tempdir.
/// Returns the tempdir too, which must be kept alive.
pub(crate) fn create_test_downloader(
    source: Arc<StubSource>,
    fetcher: Arc<RecordingFetcher>,
    max_concurrent: usize,
) -> (StickerDownloader, tempfile::TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = test_config(&temp_dir.path().join("originals"), max_concurrent);
    let downloader = StickerDownloader::with_fetcher(config, source, fetcher).unwrap();
    (downloader, temp_dir)
}
