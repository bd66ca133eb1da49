//! Utility functions for path naming and file persistence

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Characters that are not allowed inside one path component on any supported platform
const RESERVED_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Suffix of the temporary file a payload is streamed into before the final rename
const PART_SUFFIX: &str = "part";

/// Distinguishes concurrent writes to the same destination within this process
static PART_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Make a provider-supplied string safe to use as a single path component
///
/// Path separators, reserved characters and control characters become `_`.
/// Names that would resolve to the current or parent directory, and empty
/// names, are replaced by `_` as well.
///
/// # Examples
///
/// ```
/// use sticker_dl::utils::sanitize_path_component;
///
/// assert_eq!(sanitize_path_component("Cats & Dogs"), "Cats & Dogs");
/// assert_eq!(sanitize_path_component("a/b"), "a_b");
/// assert_eq!(sanitize_path_component(".."), "_");
/// ```
#[must_use]
pub fn sanitize_path_component(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || RESERVED_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// Derive a lowercase file extension from the last path segment of `url`
///
/// The query string and fragment are ignored, and percent-encoded segments are
/// decoded first. Returns `default` when the URL cannot be parsed or its last
/// segment carries no extension.
///
/// # Examples
///
/// ```
/// use sticker_dl::utils::extension_from_url;
///
/// assert_eq!(extension_from_url("https://cdn.example.com/s/cat.SVG?v=2", "bin"), "svg");
/// assert_eq!(extension_from_url("https://cdn.example.com/s/cat", "svg"), "svg");
/// ```
#[must_use]
pub fn extension_from_url(url: &str, default: &str) -> String {
    let Ok(parsed) = url::Url::parse(url) else {
        return default.to_string();
    };

    let Some(last_segment) = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
    else {
        return default.to_string();
    };

    let decoded = urlencoding::decode(last_segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| last_segment.to_string());

    Path::new(&decoded)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| default.to_string())
}

/// Temporary sibling path used by write number `unique` to `path`
///
/// Each write gets its own file, so two writers racing on one destination
/// never rename each other's data away.
pub(crate) fn part_path(path: &Path, unique: u64) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(format!(".{}-{}.{}", std::process::id(), unique, PART_SUFFIX));
    path.with_file_name(name)
}

/// Write `bytes` to `path` so that readers only ever see a complete file
///
/// The payload goes to a uniquely named `<path>.<pid>-<n>.part` sibling first
/// and is then renamed over `path`, replacing any previous file whole. When
/// several writers target the same path, the last rename wins and every
/// writer succeeds. The temporary file is removed when either step fails.
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp = part_path(path, PART_COUNTER.fetch_add(1, Ordering::Relaxed));

    if let Err(e) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e);
    }

    if let Err(e) = tokio::fs::rename(&temp, path).await {
        tracing::debug!(path = %path.display(), error = %e, "rename failed, removing partial file");
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e);
    }

    Ok(())
}
