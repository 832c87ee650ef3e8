//! Configuration types for pkgfs
//!
//! The configuration names the external tools pkgfs may shell out to and
//! the knobs the downloaders honour. It is loaded once and then treated as
//! read-only by every component.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Error, Result};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "PKGFS_CONFIG";
/// Environment variable overriding [`Config::user_agent`]
pub const USER_AGENT_ENV: &str = "PKGFS_USER_AGENT";
/// Environment variable overriding [`Config::connect_timeout`]
pub const CONNECT_TIMEOUT_ENV: &str = "PKGFS_CONNECT_TIMEOUT";

/// Main configuration structure for pkgfs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Executable overrides keyed by tool key (`curl`, `wget`, `md5sum`, ...)
    pub tools: BTreeMap<String, PathBuf>,

    /// Base user-agent sent by the downloaders
    pub user_agent: String,

    /// Connection timeout in seconds; `0` disables it
    pub connect_timeout: u64,

    /// Arguments that disable certificate pinning for curl
    pub curl_cert_flags: Vec<String>,

    /// Arguments that disable certificate pinning for wget
    pub wget_cert_flags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: BTreeMap::new(),
            user_agent: default_user_agent(),
            connect_timeout: 0,
            curl_cert_flags: Vec::new(),
            wget_cert_flags: Vec::new(),
        }
    }
}

fn default_user_agent() -> String {
    format!("pkgfs/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::io(e, Some(path.to_path_buf()), "reading configuration file")
        })?;
        toml::from_str(&contents)
            .map_err(|e| Error::configuration(format!("{}: {e}", path.display())))
    }

    /// Locate and load the configuration, then apply environment overrides.
    ///
    /// Resolution order:
    /// 1. `PKGFS_CONFIG` environment variable
    /// 2. Platform config directory + `/pkgfs/config.toml`
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or an
    /// environment override is malformed.
    pub fn discover() -> Result<Self> {
        let mut config = match crate::paths::config_file() {
            Some(path) if path.is_file() => {
                debug!(path = ?path, "Loading configuration");
                Self::load(&path)?
            }
            Some(path) => {
                debug!(path = ?path, "No configuration file, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `PKGFS_USER_AGENT` and `PKGFS_CONNECT_TIMEOUT` on top of this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `PKGFS_CONNECT_TIMEOUT` is not a whole number of seconds.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(agent) = std::env::var(USER_AGENT_ENV)
            && !agent.is_empty()
        {
            self.user_agent = agent;
        }

        if let Ok(timeout) = std::env::var(CONNECT_TIMEOUT_ENV)
            && !timeout.is_empty()
        {
            self.connect_timeout = timeout.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{CONNECT_TIMEOUT_ENV} must be a number of seconds, got '{timeout}'"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the configured executable for a tool key, if any.
    #[must_use]
    pub fn tool_override(&self, key: &str) -> Option<&Path> {
        self.tools.get(key).map(PathBuf::as_path)
    }

    /// Set an executable override for a tool key.
    pub fn set_tool(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.tools.insert(key.into(), path.into());
    }

    /// Connection timeout in seconds, or `None` when disabled.
    #[must_use]
    pub fn connect_timeout_secs(&self) -> Option<u64> {
        (self.connect_timeout > 0).then_some(self.connect_timeout)
    }

    /// The user-agent annotated with the tool that sends it.
    #[must_use]
    pub fn user_agent_for(&self, tool: &str) -> String {
        format!("{} ({tool})", self.user_agent)
    }
}
