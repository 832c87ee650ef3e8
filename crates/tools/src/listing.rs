//! Lazy directory listing backed by an external `ls`.

use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use pkgfs_core::{Error, Result, shell};
use tracing::debug;

use crate::context::Context;

const LISTER: &str = "ls";

#[cfg(unix)]
fn entry_name(bytes: Vec<u8>) -> OsString {
    use std::os::unix::ffi::OsStringExt;
    OsString::from_vec(bytes)
}

#[cfg(not(unix))]
fn entry_name(bytes: Vec<u8>) -> OsString {
    String::from_utf8_lossy(&bytes).into_owned().into()
}

/// Entries of one directory, streamed from a child process.
///
/// The sequence is finite, single-pass and cannot be restarted. `.` and
/// `..` are skipped; everything else is yielded in the order the lister
/// printed it. Entries are the lister's raw bytes, so a name that is not
/// valid UTF-8 can still be joined onto [`DirectoryListing::path`] and
/// opened. The child is reaped once the output is exhausted, when
/// [`DirectoryListing::close`] is called, or when the listing is dropped.
#[derive(Debug)]
#[must_use = "a listing does nothing unless iterated"]
pub struct DirectoryListing {
    path: PathBuf,
    reader: Option<BufReader<ChildStdout>>,
    child: Option<Child>,
    outcome: Option<bool>,
}

impl DirectoryListing {
    fn spawn(path: PathBuf, cwd: &Path) -> Result<Self> {
        let mut child = Command::new(LISTER)
            .arg("-a")
            .arg("-1")
            .arg(&path)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::execution(LISTER, format!("failed to launch: {e}")))?;

        let reader = child.stdout.take().map(BufReader::new);
        debug!(dir = ?path, pid = child.id(), "Listing directory");
        Ok(Self {
            path,
            reader,
            child: Some(child),
            outcome: None,
        })
    }

    /// The directory being listed.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the child process has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.child.is_none()
    }

    /// Release the child process now.
    ///
    /// Returns `true` only if the lister ran to completion and succeeded; a
    /// listing closed before its output was exhausted reports `false`.
    pub fn close(&mut self) -> bool {
        self.release(false)
    }

    fn release(&mut self, exhausted: bool) -> bool {
        if let Some(outcome) = self.outcome {
            return outcome;
        }
        // Closing our end first unblocks a child still writing
        self.reader = None;
        let outcome = match self.child.take() {
            Some(mut child) => {
                if !exhausted {
                    let _ = child.kill();
                }
                child
                    .wait()
                    .is_ok_and(|status| exhausted && shell::succeeded(&status))
            }
            None => false,
        };
        debug!(dir = ?self.path, exhausted, success = outcome, "Listing closed");
        self.outcome = Some(outcome);
        outcome
    }
}

impl Iterator for DirectoryListing {
    type Item = OsString;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            let mut line = Vec::new();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    self.release(true);
                    return None;
                }
                Ok(_) => {
                    while matches!(line.last(), Some(b'\n' | b'\r')) {
                        line.pop();
                    }
                    let entry = entry_name(line);
                    if entry != "." && entry != ".." {
                        return Some(entry);
                    }
                }
                Err(e) => {
                    debug!(dir = ?self.path, error = %e, "Listing read failed");
                    self.release(false);
                    return None;
                }
            }
        }
    }
}

impl Drop for DirectoryListing {
    fn drop(&mut self) {
        self.release(false);
    }
}

impl Context {
    /// List a directory, relative to the logical current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is unknown or the lister
    /// cannot be launched. A missing directory yields an empty listing.
    pub fn list_directory(&self, path: impl AsRef<Path>) -> Result<DirectoryListing> {
        let cwd = self.current_directory()?;
        let target = pkgfs_core::fs::absolutize(path.as_ref(), &cwd);
        DirectoryListing::spawn(target, &cwd)
    }
}
