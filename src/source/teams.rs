//! Microsoft Teams emoticon adapter
//!
//! Teams publishes its emoticon catalog as one versioned JSON document. The
//! current version is discovered from the web client's settings script, then
//! the whole document is fetched once and kept as an immutable lookup table
//! owned by the adapter. Item "pages" are served from that table.

use super::{CatalogSource, ItemPage, fetch_json, fetch_text};
use crate::config::TeamsConfig;
use crate::error::{Error, Result};
use crate::types::{Category, CategoryId, Item, ItemId};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::OnceCell;

const SOURCE_NAME: &str = "Teams";
const SUBDIRECTORY: &str = "teams";
const ASSET_EXTENSION: &str = "png";

/// Adapter for Microsoft Teams emoticons
pub struct TeamsSource {
    client: reqwest::Client,
    config: TeamsConfig,
    version_pattern: Regex,
    catalog: OnceCell<Catalog>,
}

/// Discovered catalog: category list plus the items of every category
#[derive(Debug)]
struct Catalog {
    categories: Vec<Category>,
    items: HashMap<CategoryId, Vec<Item>>,
}

impl TeamsSource {
    /// Create an adapter using the given HTTP client and endpoints
    ///
    /// Fails with [`Error::Config`] when `version_pattern` is not a valid
    /// regular expression or has no capture group.
    pub fn new(client: reqwest::Client, config: TeamsConfig) -> Result<Self> {
        let version_pattern = Regex::new(&config.version_pattern)
            .map_err(|e| Error::config(format!("invalid regex: {e}"), "version_pattern"))?;
        if version_pattern.captures_len() < 2 {
            return Err(Error::config(
                "pattern must capture the version in group 1",
                "version_pattern",
            ));
        }

        Ok(Self {
            client,
            config,
            version_pattern,
            catalog: OnceCell::new(),
        })
    }

    /// Resolve the current emoticon resource version
    async fn discover_version(&self) -> Result<String> {
        let discovery_failed = |reason: String| {
            tracing::error!(source = SOURCE_NAME, %reason, "emoticon version discovery failed");
            Error::DiscoveryFailed {
                source_name: SOURCE_NAME.to_string(),
                reason,
            }
        };

        let script = fetch_text(&self.client, &self.config.settings_url)
            .await
            .map_err(discovery_failed)?;

        let version = self
            .version_pattern
            .captures(&script)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                discovery_failed(format!(
                    "no emoticon resource version found in '{}'",
                    self.config.settings_url
                ))
            })?;

        tracing::debug!(source = SOURCE_NAME, %version, "discovered emoticon resource version");
        Ok(version)
    }

    async fn load_catalog(&self) -> Result<Catalog> {
        let version = self.discover_version().await?;
        let url = format!(
            "{}/{}/default.json",
            self.config.metadata_base_url.trim_end_matches('/'),
            urlencoding::encode(&version)
        );

        let metadata: MetadataResponse =
            fetch_json(&self.client, &url).await.map_err(|reason| {
                tracing::error!(source = SOURCE_NAME, %reason, "emoticon metadata unavailable");
                Error::CatalogUnavailable {
                    source_name: SOURCE_NAME.to_string(),
                    reason,
                }
            })?;

        let asset_base = self.config.asset_base_url.trim_end_matches('/');
        let mut categories = Vec::with_capacity(metadata.categories.len());
        let mut items = HashMap::with_capacity(metadata.categories.len());

        for wire in metadata.categories {
            let category = Category::new(wire.id, wire.title, wire.emoticons.len());
            let category_items = wire
                .emoticons
                .into_iter()
                .enumerate()
                .map(|(index, emoticon)| emoticon.into_item(asset_base, index))
                .collect();
            items.insert(category.id.clone(), category_items);
            categories.push(category);
        }

        Ok(Catalog { categories, items })
    }
}

#[async_trait::async_trait]
impl CatalogSource for TeamsSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn subdirectory(&self) -> Option<&str> {
        Some(SUBDIRECTORY)
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let catalog = self.catalog.get_or_try_init(|| self.load_catalog()).await?;
        Ok(catalog.categories.clone())
    }

    /// The whole category is served as page 1; later pages are empty
    async fn fetch_item_page(&self, category: &Category, page: u32) -> Result<ItemPage> {
        let page_fetch = |reason: &str| Error::PageFetch {
            category: category.title.clone(),
            page,
            reason: reason.to_string(),
        };

        let catalog = self
            .catalog
            .get()
            .ok_or_else(|| page_fetch("catalog not discovered; list categories first"))?;
        let items = catalog
            .items
            .get(&category.id)
            .ok_or_else(|| page_fetch("category not present in the emoticon catalog"))?;

        let items = if page == 1 { items.clone() } else { Vec::new() };
        Ok(ItemPage {
            page_size: Some(items.len().max(1)),
            items,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MetadataResponse {
    #[serde(default)]
    categories: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    emoticons: Vec<WireEmoticon>,
}

#[derive(Debug, Deserialize)]
struct WireEmoticon {
    id: String,
    #[serde(default)]
    etag: String,
}

impl WireEmoticon {
    fn into_item(self, asset_base: &str, index: usize) -> Item {
        let mut source_url = format!(
            "{}/{}/default/100_anim_f.{}",
            asset_base,
            urlencoding::encode(&self.id),
            ASSET_EXTENSION
        );
        // The etag selects the asset revision and goes in as the bare query string
        if !self.etag.is_empty() {
            source_url.push('?');
            source_url.push_str(&self.etag);
        }

        Item {
            display_name: self.id.clone(),
            id: ItemId::from(self.id),
            sequence_position: u32::try_from(index + 1).unwrap_or(u32::MAX),
            source_url,
            extension: ASSET_EXTENSION.to_string(),
        }
    }
}
