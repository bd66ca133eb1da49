//! Catalog source adapters
//!
//! Every remote provider is reached through the [`CatalogSource`] trait. The
//! concrete adapter is chosen once at startup from a [`SourceKind`] value and
//! then used through an `Arc<dyn CatalogSource>` for the rest of the run.
//!
//! ```ignore
//! use sticker_dl::source::SourceKind;
//!
//! let client = sticker_dl::source::http_client(&config.http)?;
//! let source = SourceKind::Teams.create(client, &config.sources)?;
//! let categories = source.list_categories().await?;
//! ```

mod flipgrid;
mod teams;

pub use flipgrid::FlipgridSource;
pub use teams::TeamsSource;

use crate::config::{HttpConfig, SourcesConfig};
use crate::error::{Error, Result};
use crate::types::{Category, Item};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fmt, str::FromStr, sync::Arc};

/// One page of a category's item listing
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemPage {
    /// Items on this page, in listing order
    pub items: Vec<Item>,
    /// Page size reported by the provider, if it reports one
    pub page_size: Option<usize>,
}

/// Capability set every provider adapter exposes
///
/// Pagination itself is driven by the downloader (see
/// [`StickerDownloader::list_items`](crate::StickerDownloader::list_items));
/// an adapter only knows how to fetch a single page.
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Display name used in logs, events and errors
    fn name(&self) -> &str;

    /// Directory below the download root this source saves into, if any
    fn subdirectory(&self) -> Option<&str> {
        None
    }

    /// Retrieve every category in one round trip
    ///
    /// Fails with [`Error::CatalogUnavailable`] when the listing cannot be
    /// retrieved, or [`Error::DiscoveryFailed`] when a required discovery
    /// step fails first.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Retrieve one page (1-based) of a category's items
    ///
    /// Any error is reported as [`Error::PageFetch`]; the caller decides
    /// whether to skip the page.
    async fn fetch_item_page(&self, category: &Category, page: u32) -> Result<ItemPage>;
}

/// The providers this crate ships adapters for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Flipgrid sticker API (paginated JSON)
    Flipgrid,
    /// Microsoft Teams emoticons (versioned metadata document)
    Teams,
}

impl SourceKind {
    /// All supported providers
    pub const ALL: [SourceKind; 2] = [SourceKind::Flipgrid, SourceKind::Teams];

    /// Build the adapter for this provider
    pub fn create(
        self,
        client: reqwest::Client,
        sources: &SourcesConfig,
    ) -> Result<Arc<dyn CatalogSource>> {
        Ok(match self {
            SourceKind::Flipgrid => Arc::new(FlipgridSource::new(client, sources.flipgrid.clone())),
            SourceKind::Teams => Arc::new(TeamsSource::new(client, sources.teams.clone())?),
        })
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Flipgrid => write!(f, "Flipgrid"),
            SourceKind::Teams => write!(f, "Teams"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "flipgrid" => Ok(SourceKind::Flipgrid),
            "teams" => Ok(SourceKind::Teams),
            other => Err(Error::config(
                format!("unknown source '{other}', expected one of: flipgrid, teams"),
                "source",
            )),
        }
    }
}

/// Build the HTTP client shared by catalog listing and asset fetching
pub fn http_client(config: &HttpConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::config(format!("failed to create HTTP client: {e}"), "http"))
}

/// GET `url` and return the body as text, or a human-readable reason
pub(crate) async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
) -> std::result::Result<String, String> {
    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            format!("timeout fetching '{url}'")
        } else if e.is_connect() {
            format!("connection failed for '{url}': {e}")
        } else {
            format!("failed to fetch '{url}': {e}")
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("HTTP {status} from '{url}'"));
    }

    response
        .text()
        .await
        .map_err(|e| format!("failed to read response body from '{url}': {e}"))
}

/// GET `url` and decode the JSON body, or a human-readable reason
///
/// Unknown fields are ignored by the wire structs, so decoding is permissive.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> std::result::Result<T, String> {
    let body = fetch_text(client, url).await?;
    serde_json::from_str(&body).map_err(|e| format!("invalid JSON from '{url}': {e}"))
}
