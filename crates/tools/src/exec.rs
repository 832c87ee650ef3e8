//! Command execution relative to the logical current directory.

use std::process::{Command, Stdio};

use pkgfs_core::{Error, Result, shell};
use tracing::{debug, warn};

use crate::context::Context;

impl Context {
    /// Run a shell command string in the logical current directory.
    ///
    /// Returns `true` only if the command exits with code `0`. If the
    /// current directory cannot be resolved nothing is run and the result
    /// is `false`. Output is not captured.
    pub fn execute(&self, command: &str) -> bool {
        let dir = match self.current_directory() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, %command, "Not executing without a working directory");
                return false;
            }
        };

        debug!(%command, dir = ?dir, "Executing");
        match shell::command_in(&dir, command).stdin(Stdio::null()).status() {
            Ok(status) => {
                let ok = shell::succeeded(&status);
                if !ok {
                    debug!(%command, %status, "Command failed");
                }
                ok
            }
            Err(e) => {
                warn!(%command, error = %e, "Failed to launch shell");
                false
            }
        }
    }
}

/// Run a prepared command to completion, mapping failure to [`Error::Execution`].
pub(crate) fn run(cmd: &mut Command, label: &str) -> Result<()> {
    debug!(command = ?cmd, "Running");
    let status = cmd
        .stdin(Stdio::null())
        .status()
        .map_err(|e| Error::execution(label, format!("failed to launch: {e}")))?;

    if shell::succeeded(&status) {
        Ok(())
    } else {
        Err(Error::execution(label, status.to_string()))
    }
}
