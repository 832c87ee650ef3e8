//! Filesystem façade.
//!
//! Every path pkgfs touches is made absolute against a logical base
//! directory first; nothing here consults the process working directory.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Make `path` absolute against `base` and normalise it lexically.
///
/// Absolute inputs ignore `base`. `.` components are dropped and `..`
/// removes the preceding component; `..` at the root stays at the root.
#[must_use]
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Lexically normalise a path without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` is `/`
                let at_root = out.parent().is_none() && out.has_root();
                let last_is_parent =
                    matches!(out.components().next_back(), Some(Component::ParentDir));
                if out.as_os_str().is_empty() || last_is_parent {
                    out.push("..");
                } else if !at_root {
                    out.pop();
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Whether `path` exists and is a directory.
#[must_use]
pub fn is_dir(path: &Path) -> bool {
    path.is_dir()
}

/// Delete a file, ignoring any error.
///
/// Returns `true` if a file was actually removed.
pub fn remove_file_best_effort(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            debug!(path = ?path, error = %e, "Nothing removed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolutize_relative() {
        assert_eq!(
            absolutize(Path::new("distfiles"), Path::new("/var/db")),
            PathBuf::from("/var/db/distfiles")
        );
    }

    #[test]
    fn test_absolutize_absolute_ignores_base() {
        assert_eq!(
            absolutize(Path::new("/opt/src"), Path::new("/var/db")),
            PathBuf::from("/opt/src")
        );
    }

    #[test]
    fn test_absolutize_parent_components() {
        assert_eq!(
            absolutize(Path::new("../work/./build"), Path::new("/var/db/pkg")),
            PathBuf::from("/var/db/work/build")
        );
        assert_eq!(
            absolutize(Path::new("../../../.."), Path::new("/a/b")),
            PathBuf::from("/")
        );
    }

    #[test]
    fn test_normalize_relative_parents_kept() {
        assert_eq!(normalize(Path::new("../../x")), PathBuf::from("../../x"));
        assert_eq!(normalize(Path::new("a/../../x")), PathBuf::from("../x"));
    }

    #[test]
    fn test_is_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(is_dir(dir.path()));
        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(!is_dir(&file));
        assert!(!is_dir(&dir.path().join("missing")));
    }

    #[test]
    fn test_remove_file_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("partial.tar.gz");
        std::fs::write(&file, b"").unwrap();
        assert!(remove_file_best_effort(&file));
        assert!(!file.exists());
        assert!(!remove_file_best_effort(&file));
    }
}
