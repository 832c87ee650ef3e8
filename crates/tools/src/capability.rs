//! Capabilities and the candidate tools that fulfil them.
//!
//! The candidate tables below are the only place tool priority is
//! expressed. Call sites branch on the key of whatever the registry
//! resolved and never re-order candidates themselves.

use std::fmt;
use std::str::FromStr;

/// An abstract operation fulfilled by one of several external tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Fetch a URL to a local file.
    Downloader,
    /// Compute an MD5 digest of a file.
    Checksum,
}

/// One concrete external tool able to fulfil a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolCandidate {
    /// Configuration key used to look up an executable override.
    pub key: &'static str,
    /// Default executable name searched on `PATH`.
    pub name: &'static str,
    /// Arguments that must run successfully for the tool to count as present.
    pub probe_args: &'static [&'static str],
    /// Arguments placed before the operands on every invocation.
    pub invoke_args: &'static [&'static str],
}

const DOWNLOADERS: &[ToolCandidate] = &[
    ToolCandidate {
        key: "curl",
        name: "curl",
        probe_args: &["--version"],
        invoke_args: &[],
    },
    ToolCandidate {
        key: "wget",
        name: "wget",
        probe_args: &["--version"],
        invoke_args: &[],
    },
];

const CHECKSUMS: &[ToolCandidate] = &[
    ToolCandidate {
        key: "md5sum",
        name: "md5sum",
        probe_args: &["--version"],
        invoke_args: &[],
    },
    ToolCandidate {
        key: "openssl",
        name: "openssl",
        probe_args: &["version"],
        invoke_args: &["md5"],
    },
    // BSD md5 has no --version; hashing an empty string proves it works
    ToolCandidate {
        key: "md5",
        name: "md5",
        probe_args: &["-s", ""],
        invoke_args: &["-r"],
    },
];

impl Capability {
    /// Every capability, in a stable order.
    pub const ALL: [Self; 2] = [Self::Downloader, Self::Checksum];

    /// Candidates in priority order.
    #[must_use]
    pub fn candidates(self) -> &'static [ToolCandidate] {
        match self {
            Self::Downloader => DOWNLOADERS,
            Self::Checksum => CHECKSUMS,
        }
    }

    /// Name used in logs and error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Downloader => "downloader",
            Self::Checksum => "checksum",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "downloader" | "download" => Ok(Self::Downloader),
            "checksum" | "md5" => Ok(Self::Checksum),
            _ => Err(format!("Unknown capability: {s}")),
        }
    }
}
