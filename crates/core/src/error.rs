//! Error types for pkgfs operations

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for pkgfs operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No candidate tool for a capability is installed on the host
    #[error("No {capability} tool is available")]
    #[diagnostic(
        code(pkgfs::tool::unavailable),
        help("Install one of the supported tools or point the configuration at one")
    )]
    ToolUnavailable {
        /// The capability that could not be fulfilled
        capability: String,
    },

    /// A directory change targeted a path that is not a directory
    #[error("directory not found: {}", path.display())]
    #[diagnostic(code(pkgfs::dir::not_found))]
    DirectoryNotFound {
        /// The path as given by the caller
        path: Box<Path>,
    },

    /// An external program exited unsuccessfully or could not be launched
    #[error("Command `{command}` failed: {message}")]
    #[diagnostic(code(pkgfs::process::failed))]
    Execution {
        /// The program that was run
        command: String,
        /// Exit status or launch error
        message: String,
    },

    /// The checksum tool did not produce a usable digest
    #[error("Failed to compute MD5 hash for file {}", path.display())]
    #[diagnostic(code(pkgfs::checksum::failed))]
    Digest {
        /// Absolute path of the file being hashed
        path: Box<Path>,
    },

    /// The base working directory could not be determined
    #[error("Could not resolve working directory: {message}")]
    #[diagnostic(code(pkgfs::dir::unresolved))]
    Resolution {
        /// Why resolution failed
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(pkgfs::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(pkgfs::io::error))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },
}

impl Error {
    /// Create a tool unavailable error for a capability
    pub fn tool_unavailable(capability: impl Into<String>) -> Self {
        Self::ToolUnavailable {
            capability: capability.into(),
        }
    }

    /// Create a directory not found error
    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound {
            path: path.into().into_boxed_path(),
        }
    }

    /// Create an execution failure for a program
    pub fn execution(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a digest failure for a file
    pub fn digest(path: impl Into<PathBuf>) -> Self {
        Self::Digest {
            path: path.into().into_boxed_path(),
        }
    }

    /// Create a working directory resolution error
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(|p| p.into_boxed_path()),
            operation: operation.into(),
        }
    }
}

/// Result type for pkgfs operations
pub type Result<T> = std::result::Result<T, Error>;
