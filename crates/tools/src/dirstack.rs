//! Logical directory stack.
//!
//! The current directory of a workflow is the fold of its pushed fragments
//! over a base directory. The process base is read from the OS once and
//! then reused, so computing the current directory never asks the OS again.

use std::ops::{Deref, DerefMut};
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};
use std::sync::OnceLock;

use pkgfs_core::{Error, Result, fs};
use tracing::debug;

static PROCESS_BASE: OnceLock<PathBuf> = OnceLock::new();

fn process_base() -> Result<&'static Path> {
    if let Some(base) = PROCESS_BASE.get() {
        return Ok(base.as_path());
    }
    let cwd = std::env::current_dir().map_err(|e| Error::resolution(e.to_string()))?;
    Ok(PROCESS_BASE.get_or_init(|| cwd).as_path())
}

/// A nested chain of logical directory changes.
#[derive(Debug, Clone, Default)]
pub struct DirectoryStack {
    /// Fixed base; `None` means the process working directory.
    base: Option<PathBuf>,
    frames: Vec<PathBuf>,
}

impl DirectoryStack {
    /// Create an empty stack over the process working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack over an explicit, absolute base directory.
    #[must_use]
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
            frames: Vec::new(),
        }
    }

    /// An empty stack sharing this stack's base.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self {
            base: self.base.clone(),
            frames: Vec::new(),
        }
    }

    /// The directory that is current when the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the process working directory cannot be read.
    pub fn base(&self) -> Result<&Path> {
        match &self.base {
            Some(base) => Ok(base.as_path()),
            None => process_base(),
        }
    }

    /// The effective current directory.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the base directory cannot be determined.
    pub fn current_directory(&self) -> Result<PathBuf> {
        let base = self.base()?;
        Ok(self
            .frames
            .iter()
            .fold(fs::normalize(base), |current, frame| {
                fs::absolutize(frame, &current)
            }))
    }

    /// Push a directory change, relative to the current directory.
    ///
    /// The stack is unchanged when `path` is not an existing directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryNotFound`] for a missing target, or a
    /// resolution error if the current directory is unknown.
    pub fn change_dir(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let target = fs::absolutize(path, &self.current_directory()?);
        if !fs::is_dir(&target) {
            return Err(Error::directory_not_found(path));
        }
        debug!(dir = ?target, depth = self.frames.len() + 1, "Changed directory");
        self.frames.push(path.to_path_buf());
        Ok(())
    }

    /// Push the filesystem root.
    ///
    /// Used to step out of a directory that is about to be deleted.
    pub fn change_dir_to_root(&mut self) {
        self.frames.push(PathBuf::from(MAIN_SEPARATOR_STR));
    }

    /// Pop one directory change. Returns `false` if the stack was empty.
    pub fn pop_dir(&mut self) -> bool {
        self.frames.pop().is_some()
    }

    /// Number of pushed directory changes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Change directory for the lifetime of the returned guard.
    ///
    /// The change is popped when the guard drops, including on early return.
    ///
    /// # Errors
    ///
    /// Same as [`DirectoryStack::change_dir`]; nothing is pushed on error.
    pub fn scoped(&mut self, path: impl AsRef<Path>) -> Result<ScopedDir<'_>> {
        self.change_dir(path)?;
        Ok(ScopedDir { stack: self })
    }
}

/// Guard returned by [`DirectoryStack::scoped`].
#[derive(Debug)]
pub struct ScopedDir<'a> {
    stack: &'a mut DirectoryStack,
}

impl Deref for ScopedDir<'_> {
    type Target = DirectoryStack;

    fn deref(&self) -> &Self::Target {
        self.stack
    }
}

impl DerefMut for ScopedDir<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.stack
    }
}

impl Drop for ScopedDir<'_> {
    fn drop(&mut self) {
        self.stack.pop_dir();
    }
}
