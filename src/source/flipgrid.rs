//! Flipgrid sticker adapter
//!
//! Categories come from `GET {base_url}`; each category's stickers from
//! `GET {base_url}/{id}/stickers?page=N`, paginated with a metadata envelope.

use super::{CatalogSource, ItemPage, fetch_json};
use crate::config::FlipgridConfig;
use crate::error::{Error, Result};
use crate::types::{Category, CategoryId, Item, ItemId};
use crate::utils::extension_from_url;
use serde::Deserialize;

const SOURCE_NAME: &str = "Flipgrid";
const DEFAULT_EXTENSION: &str = "svg";

/// Adapter for the Flipgrid sticker API
pub struct FlipgridSource {
    client: reqwest::Client,
    config: FlipgridConfig,
}

impl FlipgridSource {
    /// Create an adapter using the given HTTP client and endpoint
    pub fn new(client: reqwest::Client, config: FlipgridConfig) -> Self {
        Self { client, config }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn page_url(&self, category: &CategoryId, page: u32) -> String {
        format!(
            "{}/{}/stickers?page={}",
            self.base_url(),
            urlencoding::encode(category.as_str()),
            page
        )
    }
}

#[async_trait::async_trait]
impl CatalogSource for FlipgridSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let response: CategoriesResponse = fetch_json(&self.client, self.base_url())
            .await
            .map_err(|reason| {
                tracing::error!(source = SOURCE_NAME, %reason, "category listing failed");
                Error::CatalogUnavailable {
                    source_name: SOURCE_NAME.to_string(),
                    reason,
                }
            })?;

        Ok(response
            .data
            .into_iter()
            .map(|c| Category::new(c.id.into_text(), c.name, c.sticker_count))
            .collect())
    }

    async fn fetch_item_page(&self, category: &Category, page: u32) -> Result<ItemPage> {
        let url = self.page_url(&category.id, page);
        let response: StickersResponse =
            fetch_json(&self.client, &url)
                .await
                .map_err(|reason| Error::PageFetch {
                    category: category.title.clone(),
                    page,
                    reason,
                })?;

        let page_size = response
            .metadata
            .and_then(|m| m.pagination)
            .and_then(|p| p.limit);

        let items = response
            .data
            .into_iter()
            .filter_map(|sticker| {
                let item = sticker.into_item();
                if item.is_none() {
                    tracing::warn!(
                        category = %category.title,
                        page,
                        "sticker without a downloadable asset, skipping"
                    );
                }
                item
            })
            .collect();

        Ok(ItemPage { items, page_size })
    }
}

/// Identifier that may arrive as a JSON number or string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    fn into_text(self) -> String {
        match self {
            WireId::Number(n) => n.to_string(),
            WireId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    data: Vec<WireCategory>,
}

#[derive(Debug, Deserialize)]
struct WireCategory {
    id: WireId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sticker_count: usize,
}

#[derive(Debug, Deserialize)]
struct StickersResponse {
    #[serde(default)]
    metadata: Option<Metadata>,
    #[serde(default)]
    data: Vec<WireSticker>,
}

#[derive(Debug, Deserialize)]
struct Metadata {
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct WireSticker {
    id: WireId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    position: u32,
    #[serde(default)]
    assets: Assets,
}

#[derive(Debug, Default, Deserialize)]
struct Assets {
    #[serde(default)]
    svg: Option<String>,
    #[serde(default)]
    png: Option<String>,
}

impl WireSticker {
    /// Prefer the vector asset, fall back to the raster one
    fn into_item(self) -> Option<Item> {
        let url = self
            .assets
            .svg
            .filter(|u| !u.is_empty())
            .or(self.assets.png.filter(|u| !u.is_empty()))?;
        let id = ItemId::from(self.id.into_text());
        let display_name = if self.name.trim().is_empty() {
            id.to_string()
        } else {
            self.name
        };

        Some(Item {
            extension: extension_from_url(&url, DEFAULT_EXTENSION),
            id,
            display_name,
            sequence_position: self.position,
            source_url: url,
        })
    }
}
