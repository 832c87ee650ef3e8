//! Path utilities shared by pkgfs components.
//!
//! `basename`/`dirname` operate on `/`-separated strings so they work the
//! same for local paths and URLs.

use std::path::PathBuf;

/// Final component of a `/`-separated path or URL.
///
/// Returns an empty string when the input ends with `/`.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rfind('/').map_or(path, |idx| &path[idx + 1..])
}

/// Everything before the final component of a `/`-separated path.
///
/// Returns an empty string for a bare name and `/` for a top-level entry.
#[must_use]
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(idx) => {
            let head = path[..idx].trim_end_matches('/');
            if head.is_empty() { "/" } else { head }
        }
    }
}

/// Get the configuration file path.
///
/// Resolution order:
/// 1. `PKGFS_CONFIG` environment variable
/// 2. Platform config directory + `/pkgfs/config.toml`
///
/// Returns `None` when neither can be determined.
#[must_use]
pub fn config_file() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(crate::config::CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|base| base.join("pkgfs").join("config.toml"))
}
