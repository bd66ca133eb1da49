//! Test configuration helpers for pointing downloaders at mock servers

use sticker_dl::config::{FlipgridConfig, TeamsConfig};
use sticker_dl::{Config, SourceKind, StickerDownloader};
use tempfile::TempDir;
use wiremock::MockServer;

/// Config whose endpoints all live on `server` and whose root is inside `temp_dir`
pub fn mock_config(server: &MockServer, temp_dir: &TempDir, max_concurrent: usize) -> Config {
    let mut config = Config::default();
    config.download.download_root = temp_dir.path().join("originals");
    config.download.max_concurrent_downloads = max_concurrent;
    config.sources.flipgrid = FlipgridConfig {
        base_url: format!("{}{}", server.uri(), super::fixtures::FLIPGRID_CATEGORIES_PATH),
    };
    config.sources.teams = TeamsConfig {
        settings_url: format!("{}{}", server.uri(), super::fixtures::TEAMS_SETTINGS_PATH),
        metadata_base_url: format!("{}{}", server.uri(), super::fixtures::TEAMS_METADATA_PATH),
        asset_base_url: format!("{}{}", server.uri(), super::fixtures::TEAMS_ASSETS_PATH),
        ..TeamsConfig::default()
    };
    config
}

/// Downloader for `kind` against `server`, rooted in a fresh tempdir.
/// Returns the tempdir too, which must be kept alive.
pub fn create_mock_downloader(
    server: &MockServer,
    kind: SourceKind,
    max_concurrent: usize,
) -> (StickerDownloader, TempDir) {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = mock_config(server, &temp_dir, max_concurrent);
    let downloader = StickerDownloader::new(config, kind).expect("failed to create downloader");
    (downloader, temp_dir)
}
