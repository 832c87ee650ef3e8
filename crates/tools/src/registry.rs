//! Tool registry.
//!
//! The registry resolves each [`Capability`] to the first present candidate
//! and remembers the answer, including "nothing is installed", for as long
//! as the registry lives. A tool that appears or disappears afterwards is
//! not noticed.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Arc, OnceLock};

use pkgfs_core::{Config, Result, shell};
use tracing::{info, warn};

use crate::capability::{Capability, ToolCandidate};
use crate::probe::{HostProbe, ToolProbe};

/// A candidate found on the host, bound to the executable to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTool {
    /// Candidate key, e.g. `curl`.
    pub key: &'static str,
    /// Display name, e.g. `curl`.
    pub name: &'static str,
    /// Executable to invoke.
    pub program: PathBuf,
    /// Arguments that precede every invocation's operands.
    pub args: Vec<String>,
}

impl ResolvedTool {
    fn bind(candidate: &ToolCandidate, program: PathBuf) -> Self {
        Self {
            key: candidate.key,
            name: candidate.name,
            program,
            args: candidate.invoke_args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// A command for this tool with its invocation arguments applied.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }

    /// The fully quoted invocation prefix for use in a shell string.
    ///
    /// pkgfs itself launches tools through [`ResolvedTool::command`]; this
    /// is for callers that hand a command line to a shell, and for display
    /// (`pkgfs tools`).
    ///
    /// # Errors
    ///
    /// Returns an error if the program path or an argument cannot be quoted.
    pub fn invocation_prefix(&self) -> Result<String> {
        let program = self.program.to_string_lossy();
        shell::join(std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str)))
    }
}

/// Memoising resolver from capabilities to installed tools.
pub struct ToolRegistry {
    overrides: BTreeMap<String, PathBuf>,
    probe: Box<dyn ToolProbe>,
    downloader: OnceLock<Option<ResolvedTool>>,
    checksum: OnceLock<Option<ResolvedTool>>,
}

static SHARED: OnceLock<Arc<ToolRegistry>> = OnceLock::new();

impl ToolRegistry {
    /// Create a registry probing the host, honouring the config's tool overrides.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_probe(config, HostProbe)
    }

    /// Create a registry with a custom presence probe.
    #[must_use]
    pub fn with_probe(config: &Config, probe: impl ToolProbe + 'static) -> Self {
        Self {
            overrides: config.tools.clone(),
            probe: Box::new(probe),
            downloader: OnceLock::new(),
            checksum: OnceLock::new(),
        }
    }

    /// The process-wide registry.
    ///
    /// The first caller's configuration is used; later callers share the
    /// same instance and its cached resolutions.
    #[must_use]
    pub fn shared(config: &Config) -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::new(config))))
    }

    /// Resolve a capability to the first present candidate.
    ///
    /// Probing happens on the first call only; every later call returns the
    /// same answer.
    pub fn resolve(&self, capability: Capability) -> Option<&ResolvedTool> {
        self.slot(capability)
            .get_or_init(|| self.probe_candidates(capability))
            .as_ref()
    }

    /// Whether `capability` has already been probed.
    #[must_use]
    pub fn is_resolved(&self, capability: Capability) -> bool {
        self.slot(capability).get().is_some()
    }

    fn slot(&self, capability: Capability) -> &OnceLock<Option<ResolvedTool>> {
        match capability {
            Capability::Downloader => &self.downloader,
            Capability::Checksum => &self.checksum,
        }
    }

    fn probe_candidates(&self, capability: Capability) -> Option<ResolvedTool> {
        for candidate in capability.candidates() {
            let override_path = self.overrides.get(candidate.key).map(PathBuf::as_path);
            if let Some(program) =
                self.probe
                    .locate(override_path, candidate.name, candidate.probe_args)
            {
                info!(%capability, tool = candidate.name, program = ?program, "Resolved tool");
                return Some(ResolvedTool::bind(candidate, program));
            }
        }

        warn!(%capability, "No tool available");
        None
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("overrides", &self.overrides)
            .field("downloader", &self.downloader.get())
            .field("checksum", &self.checksum.get())
            .finish_non_exhaustive()
    }
}
