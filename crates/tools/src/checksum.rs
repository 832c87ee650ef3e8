//! MD5 digests through whichever checksum tool the registry resolved.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Stdio;
use std::sync::LazyLock;

use pkgfs_core::{Error, Result, shell};
use regex::Regex;
use tracing::debug;

use crate::capability::Capability;
use crate::context::Context;

/// A run of exactly 32 hex digits not embedded in a longer hex run.
static DIGEST_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9A-Fa-f])([0-9A-Fa-f]{32})(?:[^0-9A-Fa-f]|$)").ok()
});

/// Extract the digest from one line of checksum tool output.
///
/// Tools disagree on layout (`<hash>  <file>`, `MD5(<file>)= <hash>`,
/// `<hash> <file>`), so the first standalone 32-digit hex run anywhere in
/// the line is taken.
fn parse_digest(line: &str) -> Option<String> {
    DIGEST_PATTERN
        .as_ref()?
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

impl Context {
    /// Compute the MD5 digest of `file`, relative to the logical current directory.
    ///
    /// Returns 32 lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Digest`] naming the absolute path if no checksum
    /// tool is installed, the tool fails, or its output holds no digest.
    pub fn compute_digest(&self, file: impl AsRef<Path>) -> Result<String> {
        let path = self.absolute(file)?;
        let Some(tool) = self.resolve(Capability::Checksum) else {
            debug!(file = ?path, "No checksum tool available");
            return Err(Error::digest(path));
        };

        let mut child = match tool
            .command()
            .arg(&path)
            .current_dir(self.current_directory()?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                debug!(tool = tool.name, error = %e, "Failed to launch checksum tool");
                return Err(Error::digest(path));
            }
        };

        // Tools echo the file name's raw bytes, so the line need not be UTF-8
        let mut raw = Vec::new();
        if let Some(stdout) = child.stdout.take()
            && let Err(e) = BufReader::new(stdout).read_until(b'\n', &mut raw)
        {
            debug!(tool = tool.name, error = %e, "Failed to read checksum output");
        }
        let line = String::from_utf8_lossy(&raw);
        let status_ok = child.wait().is_ok_and(|status| shell::succeeded(&status));

        match parse_digest(&line) {
            Some(digest) if status_ok => {
                debug!(file = ?path, %digest, tool = tool.name, "Computed digest");
                Ok(digest)
            }
            _ => {
                debug!(file = ?path, tool = tool.name, output = %line.trim_end(), "No digest in output");
                Err(Error::digest(path))
            }
        }
    }

    /// Compare the MD5 digest of `file` against `expected`, ignoring case.
    ///
    /// # Errors
    ///
    /// Same as [`Context::compute_digest`].
    pub fn verify_digest(&self, file: impl AsRef<Path>, expected: &str) -> Result<bool> {
        let actual = self.compute_digest(file)?;
        Ok(actual.eq_ignore_ascii_case(expected.trim()))
    }
}
