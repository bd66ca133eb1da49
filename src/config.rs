//! Configuration types for sticker-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

/// Download behavior configuration (destination, concurrency)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Root directory assets are saved under (default: "./originals")
    #[serde(default = "default_download_root")]
    pub download_root: PathBuf,

    /// Maximum number of asset downloads in flight across all categories (default: 15)
    ///
    /// This is one global ceiling. Categories processed concurrently share it,
    /// so selecting more categories never multiplies the load on the network.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_root: default_download_root(),
            max_concurrent_downloads: default_max_concurrent(),
        }
    }
}

/// Safety bound for category listing pagination
///
/// Listing stops once the accumulated item count reaches the category's
/// declared count. A source that declares more items than it can actually
/// deliver would otherwise keep the loop running forever, so every listing
/// gets an attempt budget (and optionally a deadline).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Hard cap on page requests per category (overrides the computed budget)
    #[serde(default)]
    pub max_page_attempts: Option<u32>,

    /// Multiple of the expected page count allowed before giving up (default: 3)
    #[serde(default = "default_attempts_multiplier")]
    pub attempts_multiplier: u32,

    /// Lower bound on the computed budget (default: 3)
    #[serde(default = "default_min_page_attempts")]
    pub min_page_attempts: u32,

    /// Wall-clock limit for listing one category (None = no deadline)
    #[serde(default, with = "optional_duration_serde")]
    pub max_elapsed: Option<Duration>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_attempts: None,
            attempts_multiplier: default_attempts_multiplier(),
            min_page_attempts: default_min_page_attempts(),
            max_elapsed: None,
        }
    }
}

impl PaginationConfig {
    /// Number of page requests allowed for a category declaring `declared` items
    ///
    /// `page_size` is the size learned from the most recent successful page.
    /// Until one is known every page is assumed to hold a single item, which
    /// gives the most generous budget.
    pub fn attempt_budget(&self, declared: usize, page_size: Option<usize>) -> u32 {
        if let Some(max) = self.max_page_attempts {
            return max;
        }
        let page_size = page_size.filter(|size| *size > 0).unwrap_or(1);
        let expected_pages = declared.div_ceil(page_size);
        let computed = expected_pages.saturating_mul(self.attempts_multiplier as usize);
        let computed = u32::try_from(computed).unwrap_or(u32::MAX);
        computed.max(self.min_page_attempts)
    }
}

/// HTTP client settings shared by catalog listing and asset fetching
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Flipgrid sticker API endpoint
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlipgridConfig {
    /// Sticker category listing URL; per-category pages live below it
    #[serde(default = "default_flipgrid_base_url")]
    pub base_url: String,
}

impl Default for FlipgridConfig {
    fn default() -> Self {
        Self {
            base_url: default_flipgrid_base_url(),
        }
    }
}

/// Microsoft Teams emoticon endpoints
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamsConfig {
    /// Script that carries the current emoticon resource version
    #[serde(default = "default_teams_settings_url")]
    pub settings_url: String,

    /// Base of the versioned metadata document (`{base}/{version}/default.json`)
    #[serde(default = "default_teams_metadata_base_url")]
    pub metadata_base_url: String,

    /// Base of the emoticon asset URLs
    #[serde(default = "default_teams_asset_base_url")]
    pub asset_base_url: String,

    /// Regex whose first capture group is the resource version
    #[serde(default = "default_teams_version_pattern")]
    pub version_pattern: String,
}

impl Default for TeamsConfig {
    fn default() -> Self {
        Self {
            settings_url: default_teams_settings_url(),
            metadata_base_url: default_teams_metadata_base_url(),
            asset_base_url: default_teams_asset_base_url(),
            version_pattern: default_teams_version_pattern(),
        }
    }
}

/// Per-provider endpoint configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Flipgrid endpoints
    #[serde(default)]
    pub flipgrid: FlipgridConfig,

    /// Teams endpoints
    #[serde(default)]
    pub teams: TeamsConfig,
}

/// Main configuration for [`StickerDownloader`](crate::StickerDownloader)
///
/// Every field has a default, so `Config::default()` downloads from the
/// production endpoints into `./originals` with 15 parallel transfers.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Destination and concurrency settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Listing safety bound
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Provider endpoints
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Config {
    /// Root directory assets are saved under
    pub fn download_root(&self) -> &PathBuf {
        &self.download.download_root
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config file '{}': {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would stall or misdirect a run
    pub fn validate(&self) -> Result<()> {
        if self.download.max_concurrent_downloads == 0 {
            return Err(Error::config(
                "must allow at least one download in flight",
                "max_concurrent_downloads",
            ));
        }
        if self.download.download_root.as_os_str().is_empty() {
            return Err(Error::config("must not be empty", "download_root"));
        }
        if self.pagination.attempts_multiplier == 0 {
            return Err(Error::config("must be at least 1", "attempts_multiplier"));
        }
        if self.pagination.max_page_attempts == Some(0) {
            return Err(Error::config("must be at least 1", "max_page_attempts"));
        }
        Ok(())
    }
}

fn default_download_root() -> PathBuf {
    PathBuf::from("./originals")
}

fn default_max_concurrent() -> usize {
    15
}

fn default_attempts_multiplier() -> u32 {
    3
}

fn default_min_page_attempts() -> u32 {
    3
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("sticker-dl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_flipgrid_base_url() -> String {
    "https://api.flipgrid.com/api/sticker_categories".to_string()
}

fn default_teams_settings_url() -> String {
    "https://teams.live.com/scripts/settings.js".to_string()
}

fn default_teams_metadata_base_url() -> String {
    "https://statics.teams.cdn.live.net/evergreen-assets/personal-expressions/v1/metadata"
        .to_string()
}

fn default_teams_asset_base_url() -> String {
    "https://statics.teams.cdn.office.net/evergreen-assets/personal-expressions/v2/assets/emoticons"
        .to_string()
}

fn default_teams_version_pattern() -> String {
    r#""emoticonResourceVersion":"([a-z0-9]+)""#.to_string()
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional Duration serialization helper
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}
