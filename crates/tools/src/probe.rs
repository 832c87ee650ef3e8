//! Presence checks for external tools.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pkgfs_core::shell;
use tracing::debug;

/// Decides whether an external tool is present on the host.
///
/// Implementations receive the configured override (if any), the default
/// executable name and the probe arguments, and return the executable to
/// invoke when the tool is usable.
pub trait ToolProbe: Send + Sync {
    /// Locate a usable executable, or `None` if the tool is absent.
    fn locate(&self, override_path: Option<&Path>, name: &str, probe_args: &[&str])
    -> Option<PathBuf>;
}

/// Probe backed by the host `PATH` and real process launches.
///
/// An override is used as-is and never falls back to `PATH`: a configured
/// tool that does not exist makes the candidate absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProbe;

impl ToolProbe for HostProbe {
    fn locate(
        &self,
        override_path: Option<&Path>,
        name: &str,
        probe_args: &[&str],
    ) -> Option<PathBuf> {
        let wanted = override_path.unwrap_or_else(|| Path::new(name));
        let program = match which::which(wanted) {
            Ok(program) => program,
            Err(e) => {
                debug!(tool = name, candidate = ?wanted, error = %e, "Tool not found");
                return None;
            }
        };

        if probe_args.is_empty() {
            return Some(program);
        }

        let works = Command::new(&program)
            .args(probe_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| shell::succeeded(&status));

        if works {
            Some(program)
        } else {
            debug!(tool = name, program = ?program, ?probe_args, "Probe failed");
            None
        }
    }
}
