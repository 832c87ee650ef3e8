//! Tool abstraction layer for pkgfs.
//!
//! Package builds need a handful of operations with no portable native
//! primitive: fetching a URL, hashing a file, listing a directory and
//! running a shell command. This crate performs them by shelling out to
//! whichever external tools the host provides, while tracking a logical
//! working directory that is independent of the process's own.
//!
//! # Architecture
//!
//! - [`Capability`] / [`ToolCandidate`] - the ordered table of tools able to
//!   fulfil each capability
//! - [`ToolRegistry`] - probes candidates once and memoises the winner
//! - [`DirectoryStack`] - nested logical directory changes over a cached base
//! - [`DirectoryListing`] - lazy, single-pass directory entries
//! - [`Context`] - one workflow's stack plus the shared registry and config;
//!   downloads, digests, listings and command execution are methods on it
//!
//! # Example
//!
//! ```ignore
//! use pkgfs_tools::Context;
//!
//! let mut ctx = Context::from_env()?;
//! ctx.change_dir("distfiles")?;
//! let tarball = ctx.download("https://example.test/pkg-1.0.tar.gz", None, false)?;
//! let digest = ctx.compute_digest(&tarball)?;
//! ctx.pop_dir();
//! ```

mod capability;
mod checksum;
mod context;
mod dirstack;
mod download;
mod exec;
mod listing;
mod probe;
mod registry;

pub use capability::{Capability, ToolCandidate};
pub use context::Context;
pub use dirstack::{DirectoryStack, ScopedDir};
pub use listing::DirectoryListing;
pub use probe::{HostProbe, ToolProbe};
pub use registry::{ResolvedTool, ToolRegistry};

pub use pkgfs_core::{Config, Error, Result};
